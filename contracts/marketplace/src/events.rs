use commons::*;
use concordium_std::*;

/// An untagged event of listing a token for sale.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct ListingEvent {
    /// The ID of the token being listed.
    pub token_id: ContractTokenId,
    /// The account selling the token.
    pub seller: AccountAddress,
    /// Asking price.
    pub price: Amount,
}

/// An untagged event of a completed purchase.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct BuyEvent {
    /// The ID of the token being purchased.
    pub token_id: ContractTokenId,
    /// The account owning the token before the sale.
    pub seller: AccountAddress,
    /// The account receiving the token.
    pub buyer: AccountAddress,
    /// Full amount forwarded to the seller, overpayment included.
    pub amount_paid: Amount,
}

/// Tagged Custom event to be serialized for the event log.
#[derive(Debug, PartialEq, Eq)]
pub enum MarketEvent {
    /// Listing NFT
    Listing(ListingEvent),
    /// Buying NFT
    Buy(BuyEvent),
}

impl Serial for MarketEvent {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            MarketEvent::Listing(event) => {
                out.write_u8(LISTING_TAG)?;
                event.serial(out)
            }
            MarketEvent::Buy(event) => {
                out.write_u8(BUY_TAG)?;
                event.serial(out)
            }
        }
    }
}

impl Deserial for MarketEvent {
    fn deserial<R: Read>(source: &mut R) -> ParseResult<Self> {
        let tag = source.read_u8()?;
        match tag {
            LISTING_TAG => ListingEvent::deserial(source).map(MarketEvent::Listing),
            BUY_TAG => BuyEvent::deserial(source).map(MarketEvent::Buy),
            _ => Err(ParseError::default()),
        }
    }
}
