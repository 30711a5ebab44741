use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("customer '{customer}' has no self link")]
    MissingSelfLink { customer: String },
    #[error("unknown customer field '{0}'")]
    UnknownField(String),
}
