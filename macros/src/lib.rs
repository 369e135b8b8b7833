use proc_macro::TokenStream;
use quote::quote;

/// Register a unit enum as a flag enum.
///
/// The attribute argument selects the backing integer type (`u8`/`u16`/
/// `u32`/`u64` or the signed equivalents) and defaults to `u32`. Missing
/// discriminants follow Rust's previous-plus-one rule.
#[proc_macro_attribute]
pub fn flag_enum(attr: TokenStream, item: TokenStream) -> TokenStream {
    // Parse representation type
    let attr: TokenStream = (!attr.is_empty())
        .then_some(attr)
        .unwrap_or_else(|| quote!(u32).into());
    let ty = syn::parse_macro_input!(attr as syn::Type);
    // Parse enum name and variants
    let item = syn::parse_macro_input!(item as syn::ItemEnum);
    let name = item.ident.clone();
    if item.variants.is_empty() {
        return syn::Error::new_spanned(&item.ident, "flag enum requires at least one variant")
            .to_compile_error()
            .into();
    }
    let mut idents = Vec::with_capacity(item.variants.len());
    for variant in &item.variants {
        if !matches!(variant.fields, syn::Fields::Unit) {
            return syn::Error::new_spanned(variant, "flag enum variants must be unit variants")
                .to_compile_error()
                .into();
        }
        idents.push(variant.ident.clone());
    }

    quote! {
        #[derive(Clone, Copy, Hash, PartialEq, Eq)]
        #[repr(#ty)]
        #item

        impl ::enumbits::FlagEnum for #name {
            type Bits = #ty;

            const FLAGS: bool = true;

            fn name(self) -> &'static str {
                match self {
                    #(Self::#idents => ::core::stringify!(#idents),)*
                }
            }

            fn bits(self) -> #ty {
                self as #ty
            }

            fn members() -> &'static [Self] {
                &[#(Self::#idents,)*]
            }
        }

        impl core::ops::Not for #name {
            type Output = ::enumbits::FlagSet<#name>;
            #[inline(always)]
            fn not(self) -> Self::Output {
                use ::enumbits::FlagEnum;
                ::enumbits::FlagSet::from_bits(!self.bits())
            }
        }

        impl core::ops::BitAnd<#name> for #name {
            type Output = ::enumbits::FlagSet<Self>;
            #[inline(always)]
            fn bitand(self, x: Self) -> Self::Output {
                use ::enumbits::FlagEnum;
                ::enumbits::FlagSet::from_bits(self.bits() & x.bits())
            }
        }

        impl core::ops::BitAnd<::enumbits::FlagSet<#name>> for #name {
            type Output = ::enumbits::FlagSet<Self>;
            #[inline(always)]
            fn bitand(self, x: ::enumbits::FlagSet<Self>) -> Self::Output {
                use ::enumbits::FlagEnum;
                ::enumbits::FlagSet::from_bits(self.bits() & x.bits())
            }
        }

        impl core::ops::BitOr<#name> for #name {
            type Output = ::enumbits::FlagSet<Self>;
            #[inline(always)]
            fn bitor(self, x: Self) -> Self::Output {
                use ::enumbits::FlagEnum;
                ::enumbits::FlagSet::from_bits(self.bits() | x.bits())
            }
        }

        impl core::ops::BitOr<::enumbits::FlagSet<Self>> for #name {
            type Output = ::enumbits::FlagSet<Self>;
            #[inline(always)]
            fn bitor(self, x: ::enumbits::FlagSet<Self>) -> Self::Output {
                use ::enumbits::FlagEnum;
                ::enumbits::FlagSet::from_bits(self.bits() | x.bits())
            }
        }

        impl core::ops::BitXor<#name> for #name {
            type Output = ::enumbits::FlagSet<Self>;
            #[inline(always)]
            fn bitxor(self, x: Self) -> Self::Output {
                use ::enumbits::FlagEnum;
                ::enumbits::FlagSet::from_bits(self.bits() ^ x.bits())
            }
        }

        impl core::ops::BitXor<::enumbits::FlagSet<Self>> for #name {
            type Output = ::enumbits::FlagSet<Self>;
            #[inline(always)]
            fn bitxor(self, x: ::enumbits::FlagSet<Self>) -> Self::Output {
                use ::enumbits::FlagEnum;
                ::enumbits::FlagSet::from_bits(self.bits() ^ x.bits())
            }
        }

        impl From<#name> for #ty {
            #[inline(always)]
            fn from(x: #name) -> #ty {
                use ::enumbits::FlagEnum;
                x.bits()
            }
        }

        impl core::fmt::Debug for #name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                use ::enumbits::FlagEnum;
                write!(f, "{}", self.name())
            }
        }

        impl core::fmt::Binary for #name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                use ::enumbits::FlagEnum;
                core::fmt::Binary::fmt(&self.bits(), f)
            }
        }

        impl core::fmt::LowerHex for #name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                use ::enumbits::FlagEnum;
                core::fmt::LowerHex::fmt(&self.bits(), f)
            }
        }

        impl core::fmt::UpperHex for #name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                use ::enumbits::FlagEnum;
                core::fmt::UpperHex::fmt(&self.bits(), f)
            }
        }
    }
    .into()
}
