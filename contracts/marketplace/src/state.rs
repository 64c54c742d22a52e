use commons::*;
use concordium_std::*;

use crate::helper::token_id_from_index;
use crate::registry::TokenRegistry;

/// An offer to sell a specific token at a specific price.
///
/// Records are written by `listNFT` and flipped inactive by `buyNFT`; they
/// are never removed, only overwritten by the next successful listing. The
/// seller is the token owner at listing time and is not re-validated when
/// ownership changes outside the buy path.
#[derive(Debug, Serialize, SchemaType, Clone, Copy, PartialEq, Eq)]
pub struct Listing {
    /// The account that listed the token.
    pub seller: AccountAddress,
    /// Asking price. Strictly positive for every record written by `listNFT`.
    pub price: Amount,
    /// Whether the offer is currently active.
    pub is_listed: bool,
}

/// The contract state.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// The only account allowed to mint.
    pub minter: AccountAddress,
    /// Collection name, embedded in every rendered token URI.
    pub name: String,
    /// Collection symbol.
    pub symbol: String,
    /// Next token index. Incremented once per successful mint, never reused
    /// and never decremented, so the ID space is append only with no gaps.
    pub token_counter: u32,
    /// Immutable metadata stored at mint time, keyed by token ID.
    pub metadata: StateMap<ContractTokenId, String, S>,
    /// Sale offers keyed by token ID.
    pub listings: StateMap<ContractTokenId, Listing, S>,
    /// Ownership ledger.
    pub registry: TokenRegistry<S>,
}

// Functions for creating and updating the contract state.
impl<S: HasStateApi> State<S> {
    /// Creates a new state with no tokens and no listings.
    pub fn new(
        state_builder: &mut StateBuilder<S>,
        name: String,
        symbol: String,
        minter: AccountAddress,
    ) -> Self {
        State {
            minter,
            name,
            symbol,
            token_counter: 0,
            metadata: state_builder.new_map(),
            listings: state_builder.new_map(),
            registry: TokenRegistry::empty(state_builder),
        }
    }

    /// Store metadata at the current counter value, register ownership for
    /// the recipient and advance the counter. Returns the new token ID.
    pub fn mint_token(
        &mut self,
        metadata: String,
        recipient: AccountAddress,
    ) -> ContractResult<ContractTokenId> {
        let token_id = token_id_from_index(self.token_counter);
        self.registry.mint(token_id.clone(), recipient)?;
        self.metadata.insert(token_id.clone(), metadata);
        self.token_counter += 1;
        Ok(token_id)
    }

    /// The active listing for a token, if any.
    pub fn active_listing(&self, token_id: &ContractTokenId) -> Option<Listing> {
        self.listings
            .get(token_id)
            .map(|listing| *listing)
            .filter(|listing| listing.is_listed)
    }

    /// Overwrite the listing record for a token with a fresh active offer.
    ///
    /// It is safe to overwrite an inactive record: after a buy the old
    /// record stays around with `is_listed` false until the next listing
    /// replaces it.
    pub fn list(&mut self, token_id: ContractTokenId, seller: AccountAddress, price: Amount) {
        self.listings.insert(
            token_id,
            Listing {
                seller,
                price,
                is_listed: true,
            },
        );
    }

    /// Deactivate the listing for a token, keeping the record readable.
    /// Fails with `NotListed` if no active listing exists.
    pub fn close_listing(&mut self, token_id: &ContractTokenId) -> ContractResult<Listing> {
        let mut listing = self
            .listings
            .get_mut(token_id)
            .ok_or_else(|| ContractError::from(CustomContractError::NotListed))?;
        ensure!(listing.is_listed, CustomContractError::NotListed.into());
        listing.is_listed = false;
        Ok(*listing)
    }
}
