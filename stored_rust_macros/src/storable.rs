use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

pub fn derive_storable(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    // Field marked #[storable(id)], or default to a field named "id"
    let id_field = extract_field(&input, "id");

    // Field marked #[storable(last_update)], or default to "last_update"
    let last_update_field = extract_field(&input, "last_update");

    // Optional #[storable(partition_key)]; absent means the trait default
    // (key derived from the id) stands
    let partition_key_impl = match find_marked_field(&input, "partition_key") {
        Some(field) => quote! {
            fn partition_key(&self) -> stored_rust::PartitionKey {
                stored_rust::PartitionKey::derive(&self.#field)
            }
        },
        None => quote! {},
    };

    let expanded = quote! {
        impl stored_rust::Storable for #name {
            fn id(&self) -> &str {
                &self.#id_field
            }

            #partition_key_impl

            fn last_update(&self) -> Option<std::time::SystemTime> {
                self.#last_update_field
            }

            fn with_last_update(mut self, at: std::time::SystemTime) -> Self {
                self.#last_update_field = Some(at);
                self
            }
        }
    };

    TokenStream::from(expanded)
}

fn extract_field(input: &DeriveInput, marker: &str) -> syn::Ident {
    if let Some(field) = find_marked_field(input, marker) {
        return field;
    }

    if let Some(field) = find_named_field(input, marker) {
        return field;
    }

    panic!(
        "Storable derive: no field marked with #[storable({})] and no field named `{}`",
        marker, marker
    );
}

fn find_marked_field(input: &DeriveInput, marker: &str) -> Option<syn::Ident> {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            for field in &fields.named {
                for attr in &field.attrs {
                    if !attr.path().is_ident("storable") {
                        continue;
                    }

                    let mut is_marked = false;
                    let _ = attr.parse_nested_meta(|meta| {
                        if meta.path.is_ident(marker) {
                            is_marked = true;
                        }
                        Ok(())
                    });
                    if is_marked {
                        return field.ident.clone();
                    }
                }
            }
        }
    }
    None
}

fn find_named_field(input: &DeriveInput, name: &str) -> Option<syn::Ident> {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            for field in &fields.named {
                if let Some(ident) = &field.ident {
                    if ident == name {
                        return Some(ident.clone());
                    }
                }
            }
        }
    }
    None
}
