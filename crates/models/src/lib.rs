pub mod error;
pub mod games;
pub mod predictions;
pub mod stats;
pub mod teams;

pub use error::*;
pub use games::*;
pub use predictions::*;
pub use stats::*;
pub use teams::{find_team, normalize_team_name, team_id, team_name, Team, TEAMS};
