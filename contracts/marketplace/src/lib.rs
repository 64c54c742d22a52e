//! A fixed price NFT marketplace smart contract.
//!
//! # Description
//! An instance of this contract manages a single token collection. The
//! account creating the instance becomes the minting authority: only that
//! account can mint new tokens, each identified by a monotonic counter
//! value and carrying an immutable metadata string.
//!
//! Token owners can list their token at a strictly positive price through
//! `listNFT`. Anyone can then buy a listed token through the payable
//! `buyNFT` entrypoint: the full attached amount is forwarded to the
//! account that listed the token, ownership moves to the buyer and the
//! listing is deactivated, all within the same invocation. Owners can also
//! hand a token over directly with `transferOwnership`, which does not
//! touch the listing map.
//!
//! Ownership bookkeeping is delegated to the [`registry`] module, which
//! maps every token ID to exactly one owner. `tokenURI` renders the stored
//! metadata as a base64 encoded JSON data URI.
#![cfg_attr(not(feature = "std"), no_std)]

mod constants;
mod contract;
mod events;
mod external;
mod helper;
mod registry;
mod state;
