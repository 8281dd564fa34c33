//! Code generation for the `register_block!` macro.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::parse::{RegisterBlock, RegisterDef};

/// Generates the struct, its constructor, `SPAN`, and all accessors.
pub fn generate(block: &RegisterBlock) -> syn::Result<TokenStream> {
    let vis = &block.vis;
    let name = &block.name;
    let attrs = &block.attrs;

    let mut span = 0u64;
    let mut methods = TokenStream::new();
    for reg in &block.registers {
        reg.check_alignment()?;
        span = span.max(reg.end()?);
        if reg.access.readable() {
            methods.extend(generate_read(reg));
        }
        if reg.access.writable() {
            methods.extend(generate_write(reg));
        }
    }

    Ok(quote! {
        #(#attrs)*
        #[derive(Debug, Clone, Copy)]
        #vis struct #name {
            base: ::avalon_mmio::VirtAddr,
        }

        impl #name {
            /// Number of bytes from the base that the register window spans.
            #vis const SPAN: u64 = #span;

            /// Creates a register window accessor.
            ///
            /// # Safety
            ///
            /// `base` must point to a valid, mapped MMIO region of at least
            /// [`Self::SPAN`] bytes that stays mapped for the accessor's lifetime.
            #[must_use]
            #vis const unsafe fn new(base: ::avalon_mmio::VirtAddr) -> Self {
                Self { base }
            }

            /// Returns the base virtual address.
            #[must_use]
            #vis const fn base(&self) -> ::avalon_mmio::VirtAddr {
                self.base
            }

            #methods
        }
    })
}

fn generate_read(reg: &RegisterDef) -> TokenStream {
    let name = &reg.name;
    let offset = &reg.offset;
    let width_ty = width_type(reg);
    let attrs = &reg.attrs;

    let raw = quote! {
        // SAFETY: Caller of `new` guarantees base points to a mapped window
        // covering `SPAN` bytes.
        unsafe {
            core::ptr::read_volatile(
                (self.base.as_u64() + #offset) as *const #width_ty
            )
        }
    };

    match reg.bitflags_type {
        Some(ref bf_type) => quote! {
            #(#attrs)*
            #[inline]
            #[must_use]
            pub fn #name(&self) -> #bf_type {
                #bf_type::from_bits_retain(#raw)
            }
        },
        None => quote! {
            #(#attrs)*
            #[inline]
            #[must_use]
            pub fn #name(&self) -> #width_ty {
                #raw
            }
        },
    }
}

fn generate_write(reg: &RegisterDef) -> TokenStream {
    let name = &reg.name;
    let setter_name = format_ident!("set_{}", name);
    let offset = &reg.offset;
    let width_ty = width_type(reg);
    let set_doc = format!("Writes the `{name}` register.");

    let (param_ty, value) = match reg.bitflags_type {
        Some(ref bf_type) => (quote! { #bf_type }, quote! { value.bits() }),
        None => (quote! { #width_ty }, quote! { value }),
    };

    quote! {
        #[doc = #set_doc]
        #[inline]
        pub fn #setter_name(&self, value: #param_ty) {
            // SAFETY: Caller of `new` guarantees base points to a mapped window
            // covering `SPAN` bytes.
            unsafe {
                core::ptr::write_volatile(
                    (self.base.as_u64() + #offset) as *mut #width_ty,
                    #value,
                );
            }
        }
    }
}

fn width_type(reg: &RegisterDef) -> TokenStream {
    let ident = format_ident!("{}", reg.width.type_name());
    quote! { #ident }
}
