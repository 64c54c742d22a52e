use commons::*;
use concordium_cis1::*;
use concordium_std::*;

use crate::constants::*;
use crate::events::*;
use crate::external::*;
use crate::helper::*;
use crate::state::{Listing, State};

/// Initialize the marketplace with no tokens and no listings. The account
/// creating the instance becomes the minting authority.
#[init(contract = "NftMarketplace", parameter = "InitParams")]
fn init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params = InitParams::deserial(&mut ctx.parameter_cursor())?;
    Ok(State::new(
        state_builder,
        params.name,
        params.symbol,
        ctx.init_origin(),
    ))
}

/// Mint a new token owned by the given account.
///
/// The token is assigned the current counter value as its ID and the
/// counter then advances, so the ID space is append only: no gaps, no
/// reuse. The metadata string is stored as-is and never changes.
/// Logs a `Mint` and a `TokenMetadata` event.
///
/// It rejects if:
/// - The sender is not the minting authority.
/// - The recipient is the zero address.
/// - Fails to parse parameter.
/// - Fails to log an event.
#[receive(
    contract = "NftMarketplace",
    name = "mint",
    parameter = "MintParams",
    mutable,
    enable_logger
)]
fn mint<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: MintParams = ctx.parameter_cursor().get()?;

    ensure!(
        ctx.sender().matches_account(&host.state().minter),
        ContractError::Unauthorized
    );
    ensure!(
        params.recipient != ZERO_ADDRESS,
        CustomContractError::AddressZeroDetected.into()
    );

    let index = host.state().token_counter;
    let state = host.state_mut();
    let token_id = state.mint_token(params.metadata.clone(), params.recipient)?;
    let uri = build_token_uri(&state.name, index, &params.metadata);

    // Event for minted NFT.
    logger.log(&Cis1Event::Mint(MintEvent {
        token_id: token_id.clone(),
        amount: 1,
        owner: Address::Account(params.recipient),
    }))?;

    // Metadata URL for the NFT.
    logger.log(&token_metadata_event(token_id, uri))?;

    Ok(())
}

/// List a token for sale at a fixed price.
///
/// Overwrites whatever listing record exists for the token, so a token
/// that was bought can be listed again by its new owner.
/// Logs a `Listing` event.
///
/// It rejects if:
/// - The sender is not an account address.
/// - The sender does not currently own the token.
/// - The token already has an active listing.
/// - The price is zero.
/// - Fails to parse parameter.
/// - Fails to log an event.
#[receive(
    contract = "NftMarketplace",
    name = "listNFT",
    parameter = "ListParams",
    mutable,
    enable_logger
)]
fn list_nft<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let sender = get_account_address(ctx.sender())?;
    let params: ListParams = ctx.parameter_cursor().get()?;

    let owner = host.state().registry.owner_of(&params.token_id)?;
    ensure!(owner == sender, CustomContractError::OnlyNftOwner.into());
    ensure!(
        host.state().active_listing(&params.token_id).is_none(),
        CustomContractError::AlreadyListed.into()
    );
    ensure!(
        params.price > Amount::zero(),
        CustomContractError::PriceMustBeGreaterThanZero.into()
    );

    host.state_mut()
        .list(params.token_id.clone(), sender, params.price);

    // Event for listing NFT.
    logger.log(&MarketEvent::Listing(ListingEvent {
        token_id: params.token_id,
        seller: sender,
        price: params.price,
    }))?;

    Ok(())
}

/// Buy a listed token.
///
/// The full attached amount is forwarded to the stored seller, overpayment
/// included; ownership moves to the buyer and the listing is deactivated,
/// all within the same invocation. Payment goes to the seller recorded at
/// listing time, not to whoever the registry currently reports as owner;
/// if that seller no longer owns the token the ownership move fails and
/// the whole purchase is rejected.
/// Logs a `Transfer` and a `Buy` event.
///
/// It rejects if:
/// - The sender is not an account address.
/// - The token has no active listing.
/// - The attached amount is below the asking price.
/// - The payout to the seller cannot be completed.
/// - Fails to parse parameter.
/// - Fails to log an event.
#[receive(
    contract = "NftMarketplace",
    name = "buyNFT",
    parameter = "BuyParams",
    mutable,
    enable_logger,
    payable
)]
fn buy_nft<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let buyer = get_account_address(ctx.sender())?;
    let params: BuyParams = ctx.parameter_cursor().get()?;

    let listing = host
        .state()
        .active_listing(&params.token_id)
        .ok_or_else(|| ContractError::from(CustomContractError::NotListed))?;
    ensure!(amount >= listing.price, ContractError::InsufficientFunds);

    // Full attached amount goes to the seller; overpayment is not refunded.
    host.invoke_transfer(&listing.seller, amount)
        .map_err(|_| ContractError::InsufficientFunds)?;

    let state = host.state_mut();
    state.close_listing(&params.token_id)?;
    state
        .registry
        .transfer(listing.seller, buyer, &params.token_id)?;

    // Event for the ownership move.
    logger.log(&Cis1Event::Transfer(TransferEvent {
        token_id: params.token_id.clone(),
        amount: 1,
        from: Address::Account(listing.seller),
        to: Address::Account(buyer),
    }))?;

    // Event for buying NFT.
    logger.log(&MarketEvent::Buy(BuyEvent {
        token_id: params.token_id,
        seller: listing.seller,
        buyer,
        amount_paid: amount,
    }))?;

    Ok(())
}

/// Transfer a token to another account, peer to peer.
///
/// Any listing for the token is left untouched: an active listing keeps
/// naming the previous owner as seller until the token is bought or
/// relisted.
/// Logs a `Transfer` event.
///
/// It rejects if:
/// - The sender is not an account address.
/// - The new owner is the zero address.
/// - The sender does not currently own the token.
/// - Fails to parse parameter.
/// - Fails to log an event.
#[receive(
    contract = "NftMarketplace",
    name = "transferOwnership",
    parameter = "TransferOwnershipParams",
    mutable,
    enable_logger
)]
fn transfer_ownership<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let sender = get_account_address(ctx.sender())?;
    let params: TransferOwnershipParams = ctx.parameter_cursor().get()?;

    ensure!(
        params.new_owner != ZERO_ADDRESS,
        CustomContractError::AddressZeroDetected.into()
    );
    let owner = host.state().registry.owner_of(&params.token_id)?;
    ensure!(owner == sender, CustomContractError::OnlyNftOwner.into());

    host.state_mut()
        .registry
        .transfer(sender, params.new_owner, &params.token_id)?;

    // Event for the ownership move.
    logger.log(&Cis1Event::Transfer(TransferEvent {
        token_id: params.token_id,
        amount: 1,
        from: Address::Account(sender),
        to: Address::Account(params.new_owner),
    }))?;

    Ok(())
}

/// Render the URI for a token: a JSON object with the collection name, a
/// fixed description and the stored metadata string, base64 encoded behind
/// the data URI scheme marker. Pure function of stored state.
///
/// It rejects if:
/// - The token ID does not decode to an index below the current counter.
#[receive(
    contract = "NftMarketplace",
    name = "tokenURI",
    parameter = "ContractTokenId",
    return_value = "String"
)]
fn token_uri<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<String> {
    let token_id: ContractTokenId = ctx.parameter_cursor().get()?;
    let state = host.state();

    let index = token_index(&token_id).ok_or(ContractError::InvalidTokenId)?;
    ensure!(index < state.token_counter, ContractError::InvalidTokenId);
    let metadata = state
        .metadata
        .get(&token_id)
        .ok_or(ContractError::InvalidTokenId)?;

    Ok(build_token_uri(&state.name, index, metadata.as_str()))
}

/// View the listing record for a token, active or not.
#[receive(
    contract = "NftMarketplace",
    name = "viewListing",
    parameter = "ContractTokenId",
    return_value = "Listing"
)]
fn view_listing<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Listing> {
    let token_id: ContractTokenId = ctx.parameter_cursor().get()?;

    Ok(*host
        .state()
        .listings
        .get(&token_id)
        .ok_or_else(|| ContractError::from(CustomContractError::NotListed))?)
}

/// View the current owner of a token.
#[receive(
    contract = "NftMarketplace",
    name = "ownerOf",
    parameter = "ContractTokenId",
    return_value = "AccountAddress"
)]
fn owner_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<AccountAddress> {
    let token_id: ContractTokenId = ctx.parameter_cursor().get()?;
    host.state().registry.owner_of(&token_id)
}

/// View the number of tokens held by an account.
#[receive(
    contract = "NftMarketplace",
    name = "balanceOf",
    parameter = "AccountAddress",
    return_value = "u64"
)]
fn balance_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<u64> {
    let owner: AccountAddress = ctx.parameter_cursor().get()?;
    Ok(host.state().registry.balance_of(&owner))
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use test_infrastructure::*;

    const MINTER: AccountAddress = AccountAddress([1u8; 32]);
    const ALICE: AccountAddress = AccountAddress([2u8; 32]);
    const BOB: AccountAddress = AccountAddress([3u8; 32]);
    const CAROL: AccountAddress = AccountAddress([4u8; 32]);

    const ADDRESS_MINTER: Address = Address::Account(MINTER);
    const ADDRESS_ALICE: Address = Address::Account(ALICE);
    const ADDRESS_BOB: Address = Address::Account(BOB);

    const IMAGE_0: &str = "ipfs://QmImage0";
    const PRICE: Amount = Amount::from_micro_ccd(100);

    fn token(index: u32) -> ContractTokenId {
        token_id_from_index(index)
    }

    fn fresh_state<S: HasStateApi>(state_builder: &mut StateBuilder<S>) -> State<S> {
        State::new(
            state_builder,
            String::from("Gallery"),
            String::from("GLR"),
            MINTER,
        )
    }

    /// Test helper function which creates a contract state with one token
    /// with ID 0 owned by `ALICE`.
    fn state_with_token<S: HasStateApi>(state_builder: &mut StateBuilder<S>) -> State<S> {
        let mut state = fresh_state(state_builder);
        state
            .mint_token(String::from(IMAGE_0), ALICE)
            .expect_report("Failed to mint token 0");
        state
    }

    /// Test initialization succeeds.
    #[concordium_test]
    fn test_init() {
        let mut ctx = TestInitContext::empty();
        ctx.set_init_origin(MINTER);
        let params = InitParams {
            name: String::from("Gallery"),
            symbol: String::from("GLR"),
        };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut builder = TestStateBuilder::new();

        // Call the contract function.
        let result = init(&ctx, &mut builder);

        // Check the state
        let state = result.expect_report("Contract initialization failed");
        claim_eq!(state.token_counter, 0, "No token should be minted yet");
        claim_eq!(
            state.listings.iter().count(),
            0,
            "No listings should be initialized"
        );
        claim_eq!(state.minter, MINTER, "Init origin should be the minter");
        claim_eq!(state.name, "Gallery");
        claim_eq!(state.symbol, "GLR");
    }

    /// Test minting, ensuring the new token is owned by the given address
    /// and the appropriate events are logged.
    #[concordium_test]
    fn test_mint() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_MINTER);

        let params = MintParams {
            metadata: String::from(IMAGE_0),
            recipient: ALICE,
        };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let state = fresh_state(&mut state_builder);
        let mut host = TestHost::new(state, state_builder);

        // Call the contract function.
        let result: ContractResult<()> = mint(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");

        // Check the state.
        claim_eq!(host.state().token_counter, 1, "Counter should advance by 1");
        claim_eq!(
            host.state().registry.owner_of(&token(0)),
            Ok(ALICE),
            "Token 0 should be owned by the recipient"
        );
        claim_eq!(host.state().registry.balance_of(&ALICE), 1);

        // Check the logs.
        claim!(
            logger.logs.contains(&to_bytes(&Cis1Event::Mint(MintEvent {
                token_id: token(0),
                amount: 1,
                owner: ADDRESS_ALICE,
            }))),
            "Expected an event for minting token 0"
        );
        claim!(
            logger.logs.contains(&to_bytes(&token_metadata_event(
                token(0),
                build_token_uri("Gallery", 0, IMAGE_0),
            ))),
            "Expected a metadata event for token 0"
        );
    }

    /// Test token IDs are assigned sequentially from the counter.
    #[concordium_test]
    fn test_mint_sequential_ids() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_MINTER);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let state = fresh_state(&mut state_builder);
        let mut host = TestHost::new(state, state_builder);

        let first = to_bytes(&MintParams {
            metadata: String::from(IMAGE_0),
            recipient: ALICE,
        });
        ctx.set_parameter(&first);
        let result: ContractResult<()> = mint(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");

        let second = to_bytes(&MintParams {
            metadata: String::from("ipfs://QmImage1"),
            recipient: BOB,
        });
        ctx.set_parameter(&second);
        let result: ContractResult<()> = mint(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");

        claim_eq!(host.state().token_counter, 2);
        claim_eq!(host.state().registry.owner_of(&token(0)), Ok(ALICE));
        claim_eq!(host.state().registry.owner_of(&token(1)), Ok(BOB));
    }

    /// Test minting by anyone but the minting authority fails.
    #[concordium_test]
    fn test_mint_unauthorized() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_ALICE);

        let params = MintParams {
            metadata: String::from(IMAGE_0),
            recipient: ALICE,
        };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let state = fresh_state(&mut state_builder);
        let mut host = TestHost::new(state, state_builder);

        let result: ContractResult<()> = mint(&ctx, &mut host, &mut logger);

        let err = result.expect_err_report("Expected to fail");
        claim_eq!(
            err,
            ContractError::Unauthorized,
            "Error is expected to be Unauthorized"
        );
        claim_eq!(host.state().token_counter, 0, "No token should be minted");
    }

    /// Test minting to the zero address fails.
    #[concordium_test]
    fn test_mint_to_zero_address() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_MINTER);

        let params = MintParams {
            metadata: String::from(IMAGE_0),
            recipient: ZERO_ADDRESS,
        };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let state = fresh_state(&mut state_builder);
        let mut host = TestHost::new(state, state_builder);

        let result: ContractResult<()> = mint(&ctx, &mut host, &mut logger);

        let err = result.expect_err_report("Expected to fail");
        claim_eq!(
            err,
            CustomContractError::AddressZeroDetected.into(),
            "Error is expected to be AddressZeroDetected"
        );
        claim_eq!(host.state().token_counter, 0, "No token should be minted");
    }

    /// Test listing a token succeeds and the appropriate event is logged.
    #[concordium_test]
    fn test_list() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_ALICE);

        let params = ListParams {
            token_id: token(0),
            price: PRICE,
        };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let state = state_with_token(&mut state_builder);
        let mut host = TestHost::new(state, state_builder);

        let result: ContractResult<()> = list_nft(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");

        // Check the state.
        claim_eq!(
            host.state().active_listing(&token(0)),
            Some(Listing {
                seller: ALICE,
                price: PRICE,
                is_listed: true,
            }),
            "Listing record should be active"
        );

        // Check the logs.
        claim_eq!(logger.logs.len(), 1, "Only one event should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(&MarketEvent::Listing(ListingEvent {
                token_id: token(0),
                seller: ALICE,
                price: PRICE,
            })),
            "Incorrect event emitted"
        );
    }

    /// Test listing a token not owned by the sender fails.
    #[concordium_test]
    fn test_list_not_owner() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_BOB);

        let params = ListParams {
            token_id: token(0),
            price: PRICE,
        };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let state = state_with_token(&mut state_builder);
        let mut host = TestHost::new(state, state_builder);

        let result: ContractResult<()> = list_nft(&ctx, &mut host, &mut logger);

        let err = result.expect_err_report("Expected to fail");
        claim_eq!(
            err,
            CustomContractError::OnlyNftOwner.into(),
            "Error is expected to be OnlyNftOwner"
        );
        claim!(
            host.state().active_listing(&token(0)).is_none(),
            "No listing should be created"
        );
    }

    /// Test listing with price zero fails and leaves no record behind.
    #[concordium_test]
    fn test_list_zero_price() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_ALICE);

        let params = ListParams {
            token_id: token(0),
            price: Amount::zero(),
        };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let state = state_with_token(&mut state_builder);
        let mut host = TestHost::new(state, state_builder);

        let result: ContractResult<()> = list_nft(&ctx, &mut host, &mut logger);

        let err = result.expect_err_report("Expected to fail");
        claim_eq!(
            err,
            CustomContractError::PriceMustBeGreaterThanZero.into(),
            "Error is expected to be PriceMustBeGreaterThanZero"
        );
        claim!(
            host.state().listings.get(&token(0)).is_none(),
            "No listing record should be written"
        );
    }

    /// Test listing an already listed token fails.
    #[concordium_test]
    fn test_list_already_listed() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_ALICE);

        let params = ListParams {
            token_id: token(0),
            price: PRICE,
        };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let mut state = state_with_token(&mut state_builder);
        state.list(token(0), ALICE, PRICE);
        let mut host = TestHost::new(state, state_builder);

        let result: ContractResult<()> = list_nft(&ctx, &mut host, &mut logger);

        let err = result.expect_err_report("Expected to fail");
        claim_eq!(
            err,
            CustomContractError::AlreadyListed.into(),
            "Error is expected to be AlreadyListed"
        );
    }

    /// Test buying a listed token: the seller receives the full payment,
    /// ownership moves to the buyer and the listing is deactivated.
    #[concordium_test]
    fn test_buy() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_BOB);

        let params = BuyParams { token_id: token(0) };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let mut state = state_with_token(&mut state_builder);
        state.list(token(0), ALICE, PRICE);
        let mut host = TestHost::new(state, state_builder);
        host.set_self_balance(PRICE);

        let result: ContractResult<()> = buy_nft(&ctx, &mut host, PRICE, &mut logger);
        claim!(result.is_ok(), "Results in rejection");

        // Check the payout.
        claim!(
            host.transfer_occurred(&ALICE, PRICE),
            "Seller should receive the full payment"
        );

        // Check the state.
        claim_eq!(
            host.state().registry.owner_of(&token(0)),
            Ok(BOB),
            "Buyer should own the token"
        );
        claim_eq!(host.state().registry.balance_of(&ALICE), 0);
        claim_eq!(host.state().registry.balance_of(&BOB), 1);
        claim!(
            host.state().active_listing(&token(0)).is_none(),
            "Listing should no longer be active"
        );
        let record = *host
            .state()
            .listings
            .get(&token(0))
            .expect_report("Listing record should remain readable");
        claim_eq!(
            record,
            Listing {
                seller: ALICE,
                price: PRICE,
                is_listed: false,
            },
            "Record should keep seller and price with the active flag cleared"
        );

        // Check the logs.
        claim!(
            logger
                .logs
                .contains(&to_bytes(&Cis1Event::Transfer(TransferEvent {
                    token_id: token(0),
                    amount: 1,
                    from: ADDRESS_ALICE,
                    to: ADDRESS_BOB,
                }))),
            "Expected a transfer event for the sale"
        );
        claim!(
            logger.logs.contains(&to_bytes(&MarketEvent::Buy(BuyEvent {
                token_id: token(0),
                seller: ALICE,
                buyer: BOB,
                amount_paid: PRICE,
            }))),
            "Expected a buy event for the sale"
        );
    }

    /// Test buying a token without an active listing fails.
    #[concordium_test]
    fn test_buy_not_listed() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_BOB);

        let params = BuyParams { token_id: token(0) };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let state = state_with_token(&mut state_builder);
        let mut host = TestHost::new(state, state_builder);

        let result: ContractResult<()> = buy_nft(&ctx, &mut host, PRICE, &mut logger);

        let err = result.expect_err_report("Expected to fail");
        claim_eq!(
            err,
            CustomContractError::NotListed.into(),
            "Error is expected to be NotListed"
        );
        claim_eq!(
            host.state().registry.owner_of(&token(0)),
            Ok(ALICE),
            "Ownership should be unchanged"
        );
    }

    /// Test buying with a payment below the asking price fails.
    #[concordium_test]
    fn test_buy_insufficient_funds() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_BOB);

        let params = BuyParams { token_id: token(0) };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let mut state = state_with_token(&mut state_builder);
        state.list(token(0), ALICE, PRICE);
        let mut host = TestHost::new(state, state_builder);

        let result: ContractResult<()> =
            buy_nft(&ctx, &mut host, Amount::from_micro_ccd(99), &mut logger);

        let err = result.expect_err_report("Expected to fail");
        claim_eq!(
            err,
            ContractError::InsufficientFunds,
            "Error is expected to be InsufficientFunds"
        );
        claim_eq!(
            host.state().registry.owner_of(&token(0)),
            Ok(ALICE),
            "Ownership should be unchanged"
        );
        claim!(
            host.state().active_listing(&token(0)).is_some(),
            "Listing should stay active"
        );
    }

    /// Test overpayment is forwarded to the seller in full, no refund.
    #[concordium_test]
    fn test_buy_overpayment_goes_to_seller() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_BOB);

        let params = BuyParams { token_id: token(0) };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let overpayment = PRICE + PRICE;

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let mut state = state_with_token(&mut state_builder);
        state.list(token(0), ALICE, PRICE);
        let mut host = TestHost::new(state, state_builder);
        host.set_self_balance(overpayment);

        let result: ContractResult<()> = buy_nft(&ctx, &mut host, overpayment, &mut logger);
        claim!(result.is_ok(), "Results in rejection");

        claim!(
            host.transfer_occurred(&ALICE, overpayment),
            "Seller should receive the full attached amount"
        );
        claim_eq!(
            host.self_balance(),
            Amount::zero(),
            "Nothing should be refunded to the buyer"
        );
    }

    /// Test that a listing whose seller no longer owns the token cannot be
    /// bought: the stale record stays behind and the purchase is rejected.
    #[concordium_test]
    fn test_buy_stale_listing_rejected() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_BOB);

        let params = BuyParams { token_id: token(0) };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let mut state = state_with_token(&mut state_builder);
        state.list(token(0), ALICE, PRICE);
        // Token leaves through the direct transfer path, listing untouched.
        state
            .registry
            .transfer(ALICE, CAROL, &token(0))
            .expect_report("Transfer should succeed");
        let mut host = TestHost::new(state, state_builder);
        host.set_self_balance(PRICE);

        let result: ContractResult<()> = buy_nft(&ctx, &mut host, PRICE, &mut logger);

        let err = result.expect_err_report("Expected to fail");
        claim_eq!(
            err,
            CustomContractError::OnlyNftOwner.into(),
            "Stored seller no longer owns the token"
        );
        claim_eq!(
            host.state().registry.owner_of(&token(0)),
            Ok(CAROL),
            "Ownership should be unchanged"
        );
    }

    /// Test the direct transfer succeeds and adjusts both balances.
    #[concordium_test]
    fn test_transfer_ownership() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_ALICE);

        let params = TransferOwnershipParams {
            token_id: token(0),
            new_owner: CAROL,
        };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let state = state_with_token(&mut state_builder);
        let mut host = TestHost::new(state, state_builder);

        let result: ContractResult<()> = transfer_ownership(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");

        claim_eq!(host.state().registry.owner_of(&token(0)), Ok(CAROL));
        claim_eq!(host.state().registry.balance_of(&ALICE), 0);
        claim_eq!(host.state().registry.balance_of(&CAROL), 1);

        // Check the logs.
        claim_eq!(logger.logs.len(), 1, "Only one event should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(&Cis1Event::Transfer(TransferEvent {
                token_id: token(0),
                amount: 1,
                from: ADDRESS_ALICE,
                to: Address::Account(CAROL),
            })),
            "Incorrect event emitted"
        );
    }

    /// Test the direct transfer to the zero address fails.
    #[concordium_test]
    fn test_transfer_ownership_zero_address() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_ALICE);

        let params = TransferOwnershipParams {
            token_id: token(0),
            new_owner: ZERO_ADDRESS,
        };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let state = state_with_token(&mut state_builder);
        let mut host = TestHost::new(state, state_builder);

        let result: ContractResult<()> = transfer_ownership(&ctx, &mut host, &mut logger);

        let err = result.expect_err_report("Expected to fail");
        claim_eq!(
            err,
            CustomContractError::AddressZeroDetected.into(),
            "Error is expected to be AddressZeroDetected"
        );
    }

    /// Test the direct transfer by a non-owner fails.
    #[concordium_test]
    fn test_transfer_ownership_not_owner() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_BOB);

        let params = TransferOwnershipParams {
            token_id: token(0),
            new_owner: CAROL,
        };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let state = state_with_token(&mut state_builder);
        let mut host = TestHost::new(state, state_builder);

        let result: ContractResult<()> = transfer_ownership(&ctx, &mut host, &mut logger);

        let err = result.expect_err_report("Expected to fail");
        claim_eq!(
            err,
            CustomContractError::OnlyNftOwner.into(),
            "Error is expected to be OnlyNftOwner"
        );
        claim_eq!(host.state().registry.owner_of(&token(0)), Ok(ALICE));
    }

    /// Test the direct transfer leaves an active listing untouched: the
    /// stale record keeps naming the previous owner as seller.
    #[concordium_test]
    fn test_transfer_ownership_keeps_listing_active() {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_ALICE);

        let params = TransferOwnershipParams {
            token_id: token(0),
            new_owner: CAROL,
        };
        let parameter_bytes = to_bytes(&params);
        ctx.set_parameter(&parameter_bytes);

        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let mut state = state_with_token(&mut state_builder);
        state.list(token(0), ALICE, PRICE);
        let mut host = TestHost::new(state, state_builder);

        let result: ContractResult<()> = transfer_ownership(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");

        claim_eq!(host.state().registry.owner_of(&token(0)), Ok(CAROL));
        claim_eq!(
            host.state().active_listing(&token(0)),
            Some(Listing {
                seller: ALICE,
                price: PRICE,
                is_listed: true,
            }),
            "Listing should stay active with the previous owner as seller"
        );
    }

    /// Test the token URI is rendered from the stored metadata.
    #[concordium_test]
    fn test_token_uri() {
        let mut ctx = TestReceiveContext::empty();

        let parameter_bytes = to_bytes(&token(0));
        ctx.set_parameter(&parameter_bytes);

        let mut state_builder = TestStateBuilder::new();
        let state = state_with_token(&mut state_builder);
        let host = TestHost::new(state, state_builder);

        let result: ContractResult<String> = token_uri(&ctx, &host);

        let uri = result.expect_report("Token URI should render");
        claim_eq!(
            uri,
            build_token_uri("Gallery", 0, IMAGE_0),
            "URI should embed the stored metadata"
        );
    }

    /// Test the token URI for an unminted or malformed ID fails.
    #[concordium_test]
    fn test_token_uri_invalid_id() {
        let mut ctx = TestReceiveContext::empty();

        let mut state_builder = TestStateBuilder::new();
        let state = state_with_token(&mut state_builder);
        let host = TestHost::new(state, state_builder);

        // Index at the counter is not minted yet.
        let parameter_bytes = to_bytes(&token(1));
        ctx.set_parameter(&parameter_bytes);
        let result: ContractResult<String> = token_uri(&ctx, &host);
        let err = result.expect_err_report("Expected to fail");
        claim_eq!(
            err,
            ContractError::InvalidTokenId,
            "Error is expected to be InvalidTokenId"
        );

        // IDs that never came out of the counter are rejected as well.
        let parameter_bytes = to_bytes(&TokenIdVec(vec![0, 0]));
        ctx.set_parameter(&parameter_bytes);
        let result: ContractResult<String> = token_uri(&ctx, &host);
        let err = result.expect_err_report("Expected to fail");
        claim_eq!(
            err,
            ContractError::InvalidTokenId,
            "Error is expected to be InvalidTokenId"
        );
    }

    /// Test the read-only accessors.
    #[concordium_test]
    fn test_views() {
        let mut ctx = TestReceiveContext::empty();

        let mut state_builder = TestStateBuilder::new();
        let mut state = state_with_token(&mut state_builder);
        state.list(token(0), ALICE, PRICE);
        let host = TestHost::new(state, state_builder);

        let parameter_bytes = to_bytes(&token(0));
        ctx.set_parameter(&parameter_bytes);
        let owner: ContractResult<AccountAddress> = owner_of(&ctx, &host);
        claim_eq!(owner, Ok(ALICE));

        let listing: ContractResult<Listing> = view_listing(&ctx, &host);
        claim_eq!(
            listing,
            Ok(Listing {
                seller: ALICE,
                price: PRICE,
                is_listed: true,
            })
        );

        let parameter_bytes = to_bytes(&ALICE);
        ctx.set_parameter(&parameter_bytes);
        let balance: ContractResult<u64> = balance_of(&ctx, &host);
        claim_eq!(balance, Ok(1));

        let parameter_bytes = to_bytes(&BOB);
        ctx.set_parameter(&parameter_bytes);
        let balance: ContractResult<u64> = balance_of(&ctx, &host);
        claim_eq!(balance, Ok(0));
    }

    /// Test the whole sale flow through the entrypoints: mint to Alice,
    /// Alice lists, Bob buys, Alice is paid and Bob can relist.
    #[concordium_test]
    fn test_end_to_end_sale() {
        let mut logger = TestLogger::init();
        let mut state_builder = TestStateBuilder::new();
        let state = fresh_state(&mut state_builder);
        let mut host = TestHost::new(state, state_builder);

        // Mint token 0 to Alice.
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_MINTER);
        let parameter_bytes = to_bytes(&MintParams {
            metadata: String::from(IMAGE_0),
            recipient: ALICE,
        });
        ctx.set_parameter(&parameter_bytes);
        let result: ContractResult<()> = mint(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Minting should succeed");

        // Alice lists it.
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_ALICE);
        let parameter_bytes = to_bytes(&ListParams {
            token_id: token(0),
            price: PRICE,
        });
        ctx.set_parameter(&parameter_bytes);
        let result: ContractResult<()> = list_nft(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Listing should succeed");

        // Bob buys it at the asking price.
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_BOB);
        let parameter_bytes = to_bytes(&BuyParams { token_id: token(0) });
        ctx.set_parameter(&parameter_bytes);
        host.set_self_balance(PRICE);
        let result: ContractResult<()> = buy_nft(&ctx, &mut host, PRICE, &mut logger);
        claim!(result.is_ok(), "Buying should succeed");

        claim!(
            host.transfer_occurred(&ALICE, PRICE),
            "Alice should receive the payment"
        );
        claim_eq!(host.state().registry.owner_of(&token(0)), Ok(BOB));
        claim!(
            host.state().active_listing(&token(0)).is_none(),
            "Listing should no longer be active"
        );

        // Bob can list it again.
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ADDRESS_BOB);
        let parameter_bytes = to_bytes(&ListParams {
            token_id: token(0),
            price: PRICE + PRICE,
        });
        ctx.set_parameter(&parameter_bytes);
        let result: ContractResult<()> = list_nft(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Relisting by the new owner should succeed");
        claim_eq!(
            host.state().active_listing(&token(0)),
            Some(Listing {
                seller: BOB,
                price: PRICE + PRICE,
                is_listed: true,
            })
        );
    }
}
