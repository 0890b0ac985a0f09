//! Account scopes.
//!
//! Every record belongs to exactly one scope: a user's personal namespace
//! or one group's shared namespace. Moving a user between the two never
//! migrates records; whatever lives under the other scope simply becomes
//! unreachable until the user switches back.

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

pub const PERSONAL_KIND: &str = "personal";
pub const GROUP_KIND: &str = "group";

/// The namespace a user's records are stored and queried under.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Scope {
    Personal(String),
    Group(String),
}

impl Scope {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Personal(_) => PERSONAL_KIND,
            Self::Group(_) => GROUP_KIND,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Personal(id) | Self::Group(id) => id,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    pub fn from_parts(kind: &str, id: &str) -> ResultEngine<Self> {
        match kind {
            PERSONAL_KIND => Ok(Self::Personal(id.to_string())),
            GROUP_KIND => Ok(Self::Group(id.to_string())),
            other => Err(EngineError::InvalidInput(format!(
                "invalid scope kind: {other}"
            ))),
        }
    }
}
