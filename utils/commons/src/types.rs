use super::*;

pub type ContractResult<A> = Result<A, ContractError>;

/// Contract token ID type. Every ID issued by the marketplace is the
/// 4 big-endian bytes of a monotonic `u32` counter.
pub type ContractTokenId = TokenIdVec;

/// Wrapping the custom errors in a type with CIS1 errors.
pub type ContractError = Cis1Error<CustomContractError>;
