pub mod activity;
pub mod recovery;

pub use activity::{Activity, Category, DeliveryType, Pace, Phase};
pub use recovery::{CompletionEvent, UserRecoveryState};
