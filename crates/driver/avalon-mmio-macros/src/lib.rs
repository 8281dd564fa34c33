//! Proc-macro crate for the `register_block!` MMIO register DSL.
//!
//! Generates typed accessors over a memory-mapped register window. The only
//! `unsafe` point is construction (`new()`); every generated read and write
//! is a safe volatile access relative to the window base.

mod codegen;
mod parse;

use proc_macro::TokenStream;
use syn::parse_macro_input;

use crate::parse::RegisterBlock;

/// Generates a typed MMIO register block struct with safe accessors.
///
/// # Syntax
///
/// ```ignore
/// register_block! {
///     /// Doc comment for the struct.
///     pub StructName {
///         /// Doc comment for the register.
///         [offset; width; access_mode] name => OptionalBitflagsType,
///     }
/// }
/// ```
///
/// - `offset`: byte offset from base (integer literal, e.g. `0x0C`)
/// - `width`: `u8`, `u16`, `u32`, or `u64`
/// - `access_mode`: `ro`, `wo`, or `rw`
/// - `=> Type`: optional bitflags type (needs `from_bits_retain`/`.bits()`)
///
/// # Generated Code
///
/// - `ro`/`rw`: `fn name(&self) -> Type`
/// - `wo`/`rw`: `fn set_name(&self, value: Type)`
/// - `const SPAN: u64`, the number of bytes the window must cover
///
/// The struct stores an `avalon_mmio::VirtAddr`, so the invoking crate must
/// depend on `avalon-mmio`.
#[proc_macro]
pub fn register_block(input: TokenStream) -> TokenStream {
    let block = parse_macro_input!(input as RegisterBlock);
    match codegen::generate(&block) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
