use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Index, Member};

pub fn derive_emits(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (member, field) = find_emitter_field(input)?;
    let ty = &field.ty;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::zeroin::Emits for #name #ty_generics #where_clause {
            type Value = <#ty as ::zeroin::__private::EmitterValue>::Value;

            fn emitter(&self) -> &::zeroin::Emitter< <Self as ::zeroin::Emits>::Value > {
                &self.#member
            }
        }
    })
}

fn find_emitter_field(input: &DeriveInput) -> syn::Result<(Member, &Field)> {
    let fields = match &input.data {
        Data::Struct(data_struct) => &data_struct.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Emits derive only supports structs",
            ))
        }
    };

    let mut marked = fields
        .iter()
        .enumerate()
        .filter(|(_, field)| has_emits_attr(field));

    if let Some((index, field)) = marked.next() {
        if let Some((_, extra)) = marked.next() {
            return Err(syn::Error::new_spanned(
                extra,
                "only one field may be marked #[emits]",
            ));
        }
        return Ok((member_for(index, field), field));
    }

    if let Fields::Named(named) = fields {
        if let Some(field) = named
            .named
            .iter()
            .find(|field| field.ident.as_ref().is_some_and(|ident| *ident == "emitter"))
        {
            return Ok((member_for(0, field), field));
        }
    }

    Err(syn::Error::new(
        Span::call_site(),
        "Emits derive needs a field named `emitter` or a field marked #[emits]",
    ))
}

fn has_emits_attr(field: &Field) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident("emits"))
}

fn member_for(index: usize, field: &Field) -> Member {
    match &field.ident {
        Some(ident) => Member::Named(ident.clone()),
        None => Member::Unnamed(Index::from(index)),
    }
}
