//! Kernel identity
//!
//! A kernel signature is the name plus launch geometry. Every launch in a
//! trace belongs to exactly one signature, and signatures are never merged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-component launch dimension (grid or block)
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Dim3 {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Dim3 {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}

impl From<(u32, u32, u32)> for Dim3 {
    fn from((x, y, z): (u32, u32, u32)) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Dim3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// Identity of a kernel invocation class.
///
/// Equality and hashing cover all seven fields: two launches of the same
/// kernel with different geometry are different signatures.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct KernelSignature {
    /// Short kernel name as recorded in the trace string table
    pub name: String,

    /// Grid dimensions
    pub grid: Dim3,

    /// Block dimensions
    pub block: Dim3,
}

impl KernelSignature {
    pub fn new(name: impl Into<String>, grid: impl Into<Dim3>, block: impl Into<Dim3>) -> Self {
        Self {
            name: name.into(),
            grid: grid.into(),
            block: block.into(),
        }
    }

    /// Display label: `name,gx,gy,gz,bx,by,bz` cut to the first `width`
    /// characters.
    ///
    /// Labels are for display only. Distinct signatures may share a label.
    pub fn label(&self, width: usize) -> String {
        self.to_string().chars().take(width).collect()
    }
}

impl fmt::Display for KernelSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.name, self.grid, self.block)
    }
}
