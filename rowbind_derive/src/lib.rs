use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Type, parse_macro_input, spanned::Spanned};

/// Derives `rowbind::Entity` and `rowbind::Mapped` for a struct with named fields.
///
/// Struct options: `#[entity(table = "...")]`. Without it the table name is
/// the struct name in snake case.
///
/// Field options, in `#[db(...)]`:
/// - `column = "..."` (alias `name`): column tag, defaults to the field name
/// - `skip`: field keeps its slot but is never mapped to a column
/// - `format = "..."`: chrono format used to parse timestamp columns
/// - `other`: field is mapped with an unsupported kind, so any matched column
///   fails materialization instead of needing a `FieldValue` impl
#[proc_macro_derive(Entity, attributes(entity, db))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_entity(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_entity(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            input.generics,
            "Entity does not support generic structs",
        ));
    }

    let entity_options = parse_entity_options(&input.attrs)?;

    let data_struct = match input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new(
                struct_name.span(),
                "Entity can only be derived for structs",
            ));
        }
    };

    let named_fields = match data_struct.fields {
        Fields::Named(fields) => fields,
        _ => {
            return Err(syn::Error::new(
                struct_name.span(),
                "Entity requires named fields",
            ));
        }
    };

    let mut fields = Vec::<EntityField>::new();
    for field in named_fields.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new(field.span(), "Entity requires named fields"))?;
        let options = parse_db_field_options(&field.attrs)?;
        fields.push(EntityField {
            ident,
            ty: field.ty,
            options,
        });
    }

    let table_name = entity_options
        .table_name
        .unwrap_or_else(|| default_table_name(&struct_name.to_string()));

    let field_decls = fields.iter().map(EntityField::decl_tokens);

    let assign_arms = fields
        .iter()
        .filter(|field| field.options.include && !field.options.other)
        .map(|field| {
            let ident = &field.ident;
            let ty = &field.ty;
            let name = ident.to_string();
            quote! {
                #name => {
                    self.#ident = <#ty as ::rowbind::FieldValue>::from_value(value)?;
                    ::std::result::Result::Ok(())
                }
            }
        });

    Ok(quote! {
        impl ::rowbind::Mapped for #struct_name {
            fn shape() -> ::rowbind::TypeShape {
                ::rowbind::TypeShape::record::<Self>()
            }
        }

        impl ::rowbind::Entity for #struct_name {
            fn table_name() -> &'static str {
                #table_name
            }

            fn declared_fields() -> ::std::vec::Vec<::rowbind::FieldDecl> {
                ::std::vec![#(#field_decls),*]
            }

            #[allow(unreachable_code, unused_variables)]
            fn assign(&mut self, field: &str, value: ::rowbind::Value) -> ::rowbind::Result<()> {
                match field {
                    #(#assign_arms)*
                    _ => ::std::result::Result::Err(::rowbind::DbError::UnknownField {
                        entity: ::std::string::String::from(stringify!(#struct_name)),
                        field: field.to_string(),
                    }),
                }
            }
        }
    })
}

struct EntityField {
    ident: Ident,
    ty: Type,
    options: DbFieldOptions,
}

impl EntityField {
    fn decl_tokens(&self) -> TokenStream2 {
        let name = self.ident.to_string();
        let ty = &self.ty;

        if !self.options.include {
            return quote! {
                ::rowbind::FieldDecl::new(#name, ::rowbind::FieldKind::Other)
                    .tag(::rowbind::EXCLUDE_TAG)
            };
        }

        let mut decl = if self.options.other {
            quote! { ::rowbind::FieldDecl::new(#name, ::rowbind::FieldKind::Other) }
        } else {
            quote! { ::rowbind::FieldDecl::new(#name, <#ty as ::rowbind::FieldValue>::KIND) }
        };
        if let Some(column) = &self.options.column_name {
            decl = quote! { #decl.tag(#column) };
        }
        if let Some(format) = &self.options.format {
            decl = quote! { #decl.format(#format) };
        }
        decl
    }
}

struct EntityOptions {
    table_name: Option<String>,
}

struct DbFieldOptions {
    include: bool,
    other: bool,
    column_name: Option<String>,
    format: Option<String>,
}

impl Default for DbFieldOptions {
    fn default() -> Self {
        Self {
            include: true,
            other: false,
            column_name: None,
            format: None,
        }
    }
}

fn parse_db_field_options(attrs: &[syn::Attribute]) -> syn::Result<DbFieldOptions> {
    let mut options: Option<DbFieldOptions> = None;

    for attr in attrs {
        if !attr.path().is_ident("db") {
            continue;
        }

        if options.is_some() {
            return Err(syn::Error::new(
                attr.span(),
                "Duplicate #[db(...)] attribute on field",
            ));
        }

        let mut parsed = DbFieldOptions::default();
        match &attr.meta {
            syn::Meta::List(list) => {
                list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("skip") {
                        parsed.include = false;
                        return Ok(());
                    }

                    if meta.path.is_ident("other") {
                        parsed.other = true;
                        return Ok(());
                    }

                    if meta.path.is_ident("column") || meta.path.is_ident("name") {
                        let value = meta.value()?;
                        let lit: LitStr = value.parse()?;
                        parsed.column_name = Some(lit.value());
                        return Ok(());
                    }

                    if meta.path.is_ident("format") {
                        let value = meta.value()?;
                        let lit: LitStr = value.parse()?;
                        if lit.value().trim().is_empty() {
                            return Err(meta.error("#[db(format)] must not be empty"));
                        }
                        parsed.format = Some(lit.value());
                        return Ok(());
                    }

                    Err(meta.error(
                        "Unsupported #[db(...)] option. Supported: skip, other, \
                         column = \"...\", name = \"...\", format = \"...\"",
                    ))
                })?;
            }
            _ => {
                return Err(syn::Error::new(
                    attr.span(),
                    "Unsupported #[db] syntax. Use #[db(skip)], #[db(other)], \
                     #[db(column = \"...\")], #[db(format = \"...\")]",
                ));
            }
        }

        // A "-" column is the exclusion tag.
        if parsed.column_name.as_deref() == Some("-") {
            parsed.include = false;
            parsed.column_name = None;
        } else if !parsed.include && parsed.column_name.is_some() {
            return Err(syn::Error::new(
                attr.span(),
                "#[db(skip)] cannot define a custom column name",
            ));
        }

        if !parsed.include && parsed.format.is_some() {
            return Err(syn::Error::new(
                attr.span(),
                "#[db(skip)] cannot be combined with #[db(format)]",
            ));
        }

        if parsed.other && !parsed.include {
            return Err(syn::Error::new(
                attr.span(),
                "#[db(other)] cannot be combined with #[db(skip)]",
            ));
        }

        if parsed.other && parsed.format.is_some() {
            return Err(syn::Error::new(
                attr.span(),
                "#[db(other)] cannot be combined with #[db(format)]",
            ));
        }

        options = Some(parsed);
    }

    Ok(options.unwrap_or_default())
}

fn parse_entity_options(attrs: &[syn::Attribute]) -> syn::Result<EntityOptions> {
    let mut options = EntityOptions { table_name: None };

    for attr in attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value = meta.value()?;
                let lit: LitStr = value.parse()?;
                if lit.value().is_empty() {
                    return Err(meta.error("#[entity(table)] must not be empty"));
                }
                options.table_name = Some(lit.value());
                return Ok(());
            }

            Err(meta.error("Unsupported entity attribute. Supported: table = \"...\""))
        })?;
    }

    Ok(options)
}

/// `UserProfile` -> `user_profile`
fn default_table_name(type_name: &str) -> String {
    let mut table = String::with_capacity(type_name.len() + 4);
    for (i, ch) in type_name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                table.push('_');
            }
            table.push(ch.to_ascii_lowercase());
        } else if ch.is_ascii_alphanumeric() {
            table.push(ch);
        } else {
            table.push('_');
        }
    }
    table
}
