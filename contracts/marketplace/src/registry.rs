use commons::*;
use concordium_std::*;

/// Ledger of unique token ownership.
///
/// The marketplace delegates all ownership bookkeeping here: every minted
/// token ID maps to exactly one owning account, and per-account balances
/// are kept in sync with the ownership map. No other module writes owners
/// or balances.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct TokenRegistry<S: HasStateApi> {
    owners: StateMap<ContractTokenId, AccountAddress, S>,
    balances: StateMap<AccountAddress, u64, S>,
}

impl<S: HasStateApi> TokenRegistry<S> {
    /// Creates an empty registry with no tokens.
    pub fn empty(state_builder: &mut StateBuilder<S>) -> Self {
        TokenRegistry {
            owners: state_builder.new_map(),
            balances: state_builder.new_map(),
        }
    }

    /// Check that the token ID currently exists in the registry.
    #[inline(always)]
    pub fn contains_token(&self, token_id: &ContractTokenId) -> bool {
        self.owners.get(token_id).is_some()
    }

    /// Record a freshly minted token as owned by `owner`.
    /// Fails with `TokenIdAlreadyExists` if the ID is already taken.
    pub fn mint(&mut self, token_id: ContractTokenId, owner: AccountAddress) -> ContractResult<()> {
        ensure!(
            self.owners.insert(token_id, owner).is_none(),
            CustomContractError::TokenIdAlreadyExists.into()
        );
        self.credit(&owner);
        Ok(())
    }

    /// Get the current owner of a token.
    /// Fails with `InvalidTokenId` for unknown tokens.
    pub fn owner_of(&self, token_id: &ContractTokenId) -> ContractResult<AccountAddress> {
        self.owners
            .get(token_id)
            .map(|owner| *owner)
            .ok_or(ContractError::InvalidTokenId)
    }

    /// Number of tokens currently held by an account.
    pub fn balance_of(&self, owner: &AccountAddress) -> u64 {
        self.balances.get(owner).map_or(0, |balance| *balance)
    }

    /// Move a token from `from` to `to`, adjusting both balances.
    /// Fails with `InvalidTokenId` for unknown tokens and with
    /// `OnlyNftOwner` if `from` is not the current owner.
    pub fn transfer(
        &mut self,
        from: AccountAddress,
        to: AccountAddress,
        token_id: &ContractTokenId,
    ) -> ContractResult<()> {
        {
            let mut owner = self
                .owners
                .get_mut(token_id)
                .ok_or(ContractError::InvalidTokenId)?;
            ensure!(*owner == from, CustomContractError::OnlyNftOwner.into());
            *owner = to;
        }
        self.debit(&from);
        self.credit(&to);
        Ok(())
    }

    fn credit(&mut self, owner: &AccountAddress) {
        let mut balance = self.balances.entry(*owner).or_insert(0);
        *balance += 1;
    }

    fn debit(&mut self, owner: &AccountAddress) {
        if let Some(mut balance) = self.balances.get_mut(owner) {
            *balance -= 1;
        }
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use crate::helper::token_id_from_index;
    use test_infrastructure::*;

    const ALICE: AccountAddress = AccountAddress([2u8; 32]);
    const BOB: AccountAddress = AccountAddress([3u8; 32]);

    #[concordium_test]
    fn test_mint_and_lookup() {
        let mut state_builder = TestStateBuilder::new();
        let mut registry = TokenRegistry::empty(&mut state_builder);

        registry
            .mint(token_id_from_index(0), ALICE)
            .expect_report("Failed to mint token 0");
        registry
            .mint(token_id_from_index(1), ALICE)
            .expect_report("Failed to mint token 1");

        claim!(registry.contains_token(&token_id_from_index(0)));
        claim_eq!(registry.owner_of(&token_id_from_index(0)), Ok(ALICE));
        claim_eq!(registry.balance_of(&ALICE), 2);
        claim_eq!(registry.balance_of(&BOB), 0);
        claim_eq!(
            registry.owner_of(&token_id_from_index(2)),
            Err(ContractError::InvalidTokenId)
        );
    }

    #[concordium_test]
    fn test_mint_duplicate_id_rejected() {
        let mut state_builder = TestStateBuilder::new();
        let mut registry = TokenRegistry::empty(&mut state_builder);

        registry
            .mint(token_id_from_index(0), ALICE)
            .expect_report("Failed to mint token 0");
        let result = registry.mint(token_id_from_index(0), BOB);

        claim_eq!(
            result,
            Err(CustomContractError::TokenIdAlreadyExists.into()),
            "Reusing a token ID should be rejected"
        );
        claim_eq!(registry.owner_of(&token_id_from_index(0)), Ok(ALICE));
    }

    #[concordium_test]
    fn test_transfer_moves_balances() {
        let mut state_builder = TestStateBuilder::new();
        let mut registry = TokenRegistry::empty(&mut state_builder);

        registry
            .mint(token_id_from_index(0), ALICE)
            .expect_report("Failed to mint token 0");
        registry
            .transfer(ALICE, BOB, &token_id_from_index(0))
            .expect_report("Transfer should succeed");

        claim_eq!(registry.owner_of(&token_id_from_index(0)), Ok(BOB));
        claim_eq!(registry.balance_of(&ALICE), 0);
        claim_eq!(registry.balance_of(&BOB), 1);
    }

    #[concordium_test]
    fn test_transfer_by_non_owner_rejected() {
        let mut state_builder = TestStateBuilder::new();
        let mut registry = TokenRegistry::empty(&mut state_builder);

        registry
            .mint(token_id_from_index(0), ALICE)
            .expect_report("Failed to mint token 0");
        let result = registry.transfer(BOB, BOB, &token_id_from_index(0));

        claim_eq!(
            result,
            Err(CustomContractError::OnlyNftOwner.into()),
            "Only the owner may move a token"
        );
        claim_eq!(registry.owner_of(&token_id_from_index(0)), Ok(ALICE));
        claim_eq!(registry.balance_of(&ALICE), 1);
    }
}
