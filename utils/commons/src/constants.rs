/// Tag for the Custom Buy event.
pub const BUY_TAG: u8 = u8::MAX - 7;

/// Tag for the Custom Listing event.
pub const LISTING_TAG: u8 = u8::MAX - 8;
