#![doc = include_str!("../README.md")]
#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(test)]
extern crate alloc;

mod error;
pub use error::MerkleTreeError;

pub mod hasher;
#[cfg(feature = "sha2")]
pub use hasher::Sha256;
pub use hasher::{FnHasher, Keccak256, TreeHasher};

mod height;
pub use height::{TreeHeight, levels_for};

pub mod nodes;
pub use nodes::{Coordinate, MAX_HEIGHT, MAX_WIDTH, NodeKey};

mod store;
pub use store::NodeStore;

pub mod tree;
pub use tree::MerkleTree;
