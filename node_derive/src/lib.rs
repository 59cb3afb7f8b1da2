#![recursion_limit = "128"]
extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

enum FieldType {
    Input,
    Output,
    State,
}

/// Derives the Node trait for a structure.
///
/// Fields typed `NodeReceiver<T>` become inputs and fields typed
/// `NodeSender<T>` become outputs; everything else is internal state. The
/// derive generates a `new()` constructor taking the state fields in
/// declaration order, a `call()` that receives one value per input, hands
/// them to the structure's `run()` method, and broadcasts the result to
/// every connected sender, and an `is_connected()` check.
///
/// Structures marked `#[aggregate]` have a `run()` returning
/// `Result<Option<T>, NodeError>`; output is only sent when `run()`
/// produces a value.
#[proc_macro_derive(Node, attributes(aggregate))]
pub fn node_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let aggregate = input.attrs.iter().any(|a| a.path.is_ident("aggregate"));
    let mut recv_fields = vec![];
    let mut send_fields = vec![];
    let mut state_fields = vec![];
    match &input.data {
        syn::Data::Struct(data_struct) => match &data_struct.fields {
            syn::Fields::Named(fields) => {
                for field in &fields.named {
                    match parse_type(field) {
                        FieldType::Input => recv_fields.push(field),
                        FieldType::Output => send_fields.push(field),
                        FieldType::State => state_fields.push(field),
                    }
                }
            }
            _ => panic!("Node derive needs named fields."),
        },
        _ => panic!("Node derive only supports structures."),
    }

    let recv_idents1: Vec<syn::Ident> = recv_fields
        .iter()
        .map(|x| x.ident.clone().unwrap())
        .collect();
    let recv_idents2 = recv_idents1.clone();

    let recv_vals1: Vec<syn::Ident> = recv_idents1
        .iter()
        .map(|x| syn::Ident::new(&format!("recv_{}", x), x.span()))
        .collect();
    let recv_vals2 = recv_vals1.clone();

    let send_idents1: Vec<syn::Ident> = send_fields
        .iter()
        .map(|x| x.ident.clone().unwrap())
        .collect();
    let send_idents2 = send_idents1.clone();

    let state_idents1: Vec<syn::Ident> = state_fields
        .iter()
        .map(|x| x.ident.clone().unwrap())
        .collect();
    let state_idents2 = state_idents1.clone();
    let state_types: Vec<&syn::Type> =
        state_fields.iter().map(|x| &x.ty).collect();

    let recv_defaults: Vec<syn::Ident> = recv_idents1.clone();
    let send_defaults: Vec<syn::Ident> = send_idents1.clone();

    let send_out = if aggregate {
        quote! {
            if let Some(res) = res {
                #(
                    for (send, _) in &self.#send_idents1 {
                        send.send(res.clone()).map_err(|_| {
                            hearlab_rs::node::NodeError::CommError
                        })?;
                    }
                )*
            }
        }
    } else {
        quote! {
            #(
                for (send, _) in &self.#send_idents1 {
                    send.send(res.clone()).map_err(|_| {
                        hearlab_rs::node::NodeError::CommError
                    })?;
                }
            )*
        }
    };

    let macro_out = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            pub fn new(#(#state_idents1: #state_types),*) -> Self {
                #name {
                    #(
                        #state_idents2,
                    )*
                    #(
                        #recv_defaults: Default::default(),
                    )*
                    #(
                        #send_defaults: Default::default(),
                    )*
                }
            }
        }

        impl #impl_generics hearlab_rs::node::Node for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn call(&mut self) -> Result<(), hearlab_rs::node::NodeError> {
                #(
                    let #recv_vals1 = match self.#recv_idents1 {
                        Some(ref r) => r.recv().map_err(|_| {
                            hearlab_rs::node::NodeError::CommError
                        })?,
                        None => return Err(
                            hearlab_rs::node::NodeError::PermanentError,
                        ),
                    };
                )*
                let res = self.run(#(#recv_vals2),*)?;
                #send_out
                Ok(())
            }

            fn is_connected(&self) -> bool {
                #(
                    if self.#recv_idents2.is_none() {
                        return false;
                    }
                )*
                #(
                    if self.#send_idents2.is_empty() {
                        return false;
                    }
                )*
                true
            }
        }
    };
    macro_out.into()
}

fn parse_type(field: &syn::Field) -> FieldType {
    if let syn::Type::Path(ref ty) = field.ty {
        if let Some(segment) = ty.path.segments.last() {
            match segment.value().ident.to_string().as_str() {
                "NodeReceiver" => return FieldType::Input,
                "NodeSender" => return FieldType::Output,
                _ => return FieldType::State,
            }
        }
    }
    FieldType::State
}
