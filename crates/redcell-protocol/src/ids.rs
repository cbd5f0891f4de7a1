use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(TrackedId);
string_id!(AttackSessionId);
string_id!(TuningJobId);
string_id!(PlaygroundSessionId);
string_id!(ExperimentId);

impl From<AttackSessionId> for TrackedId {
    fn from(value: AttackSessionId) -> Self {
        Self::new(value.as_str())
    }
}

impl From<TuningJobId> for TrackedId {
    fn from(value: TuningJobId) -> Self {
        Self::new(value.as_str())
    }
}

impl From<PlaygroundSessionId> for TrackedId {
    fn from(value: PlaygroundSessionId) -> Self {
        Self::new(value.as_str())
    }
}
