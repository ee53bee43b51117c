//! A tree model for parsed JVM classfiles (JVMS §4): the "Parsed Classfile Model" that a
//! remapper traverses.
//!
//! This crate only models the shape of a classfile already sitting in memory. Reading a
//! classfile from bytes, or writing one back out, is explicitly out of scope here (an
//! external, ASM-tree-equivalent library is assumed to have done that already); see the
//! crate-level docs of the `remap` crate for where this tree gets consumed.

pub(crate) mod macros;
pub mod tree;
