use super::*;

/// The custom errors the contract can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Failing to mint a new token because the token ID already exists
    /// in the registry (Error code: -4).
    TokenIdAlreadyExists,
    /// A real account is required, but the zero address was supplied
    /// (Error code: -5).
    AddressZeroDetected,
    /// Only the current token owner can perform this action (Error code: -6).
    OnlyNftOwner,
    /// Listing price must be strictly positive (Error code: -7).
    PriceMustBeGreaterThanZero,
    /// Token is already listed for sale (Error code: -8).
    AlreadyListed,
    /// Token is not listed for sale (Error code: -9).
    NotListed,
    /// Only account addresses can interact with the marketplace
    /// (Error code: -10).
    OnlyAccountAddress,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping CustomContractError to ContractError
impl From<CustomContractError> for ContractError {
    fn from(c: CustomContractError) -> Self {
        Cis1Error::Custom(c)
    }
}
