pub mod check_handler;
pub mod publish_handler;
pub mod update_handler;
pub mod verify_handler;

use crate::manifest::UpdateInfo;

pub enum CheckResult {
    UpToDate { current: String },
    UpdateAvailable { current: String, info: UpdateInfo },
}
