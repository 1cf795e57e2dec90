//! Name-based policy selection for configuration files.

use serde::{Deserialize, Serialize};

use crate::{
    CompTableMoveUp, DispatchPolicy, MoveUpPolicy, NearestDispatch, NoMoveUp, PolicyError,
    PolicyResult, ReturnHomeMoveUp,
};

/// Names accepted by [`dispatch_policy_by_name`].
pub const DISPATCH_POLICIES: &[&str] = &["nearest"];

pub fn dispatch_policy_by_name(name: &str) -> PolicyResult<Box<dyn DispatchPolicy>> {
    match name {
        "nearest" => Ok(Box::new(NearestDispatch)),
        other => Err(PolicyError::UnknownPolicy { kind: "dispatch", name: other.to_owned() }),
    }
}

/// Move-up strategy as written in the JSON config:
///
/// ```json
/// { "kind": "none" }
/// { "kind": "return_home" }
/// { "kind": "comp_table", "rows": [[1, 0], [1, 1]] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveUpConfig {
    #[default]
    None,
    CompTable { rows: Vec<Vec<u32>> },
    ReturnHome,
}

impl MoveUpConfig {
    pub fn build(&self, num_stations: usize) -> PolicyResult<Box<dyn MoveUpPolicy>> {
        Ok(match self {
            MoveUpConfig::None => Box::new(NoMoveUp),
            MoveUpConfig::CompTable { rows } => Box::new(CompTableMoveUp::new(rows.clone(), num_stations)?),
            MoveUpConfig::ReturnHome => Box::new(ReturnHomeMoveUp),
        })
    }
}
