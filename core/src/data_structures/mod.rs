//! Core data structures for the coloring engine
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod coloring;
pub mod graph;

pub use self::coloring::*;
pub use self::graph::*;
