use proc_macro::TokenStream;
use quote::quote;
use syn::{parse::Parse, parse::ParseStream, parse_macro_input, DeriveInput, Expr, ExprArray, Ident, LitStr, Token};

/// Parsed agent attribute structure
struct AgentAttr {
    module: String,
    class: Option<String>,
    description: String,
    version: String,
    config_keys: Vec<String>,
}

impl Parse for AgentAttr {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut module = String::new();
        let mut class = None;
        let mut description = String::new();
        let mut version = String::from("0.1.0");
        let mut config_keys = Vec::new();

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            if input.peek(LitStr) {
                let val: LitStr = input.parse()?;
                match key.to_string().as_str() {
                    "module" => module = val.value(),
                    "class" => class = Some(val.value()),
                    "description" => description = val.value(),
                    "version" => version = val.value(),
                    other => {
                        return Err(syn::Error::new_spanned(
                            &key,
                            format!("Unknown agent attribute '{other}'"),
                        ))
                    }
                }
            } else if input.peek(syn::token::Bracket) {
                let content: ExprArray = input.parse()?;
                let mut vals = Vec::new();
                for elem in &content.elems {
                    if let Expr::Lit(syn::ExprLit { lit: syn::Lit::Str(s), .. }) = elem {
                        vals.push(s.value());
                    } else {
                        return Err(syn::Error::new_spanned(elem, "Expected a string literal"));
                    }
                }

                match key.to_string().as_str() {
                    "config_keys" => config_keys = vals,
                    other => {
                        return Err(syn::Error::new_spanned(
                            &key,
                            format!("Unknown agent list attribute '{other}'"),
                        ))
                    }
                }
            } else {
                return Err(input.error("Expected a string literal or a list of string literals"));
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(AgentAttr { module, class, description, version, config_keys })
    }
}

/// Registers a struct as an agent.
///
/// ```ignore
/// #[agentry_agent(module = "weather", class = "WeatherAgent", config_keys = ["api_key"])]
/// pub struct WeatherAgent { /* ... */ }
/// ```
///
/// The struct must implement `agentry_shared::Agent` and provide
/// `fn new_agent(config: AgentConfig) -> anyhow::Result<Self>`.
/// `class` defaults to the struct name.
#[proc_macro_attribute]
pub fn agentry_agent(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let attr = parse_macro_input!(attr as AgentAttr);

    match emit_agent_code(input, attr) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn emit_agent_code(input: DeriveInput, attr: AgentAttr) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    if attr.module.is_empty() {
        return Err(syn::Error::new_spanned(&input.ident, "Agent 'module' is required"));
    }
    if attr.module.contains(char::is_whitespace) {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Agent 'module' must not contain whitespace",
        ));
    }

    let module_str = &attr.module;
    let class_str = attr.class.clone().unwrap_or_else(|| name.to_string());
    let description_str = &attr.description;
    let version_str = &attr.version;
    let config_keys_tokens = attr.config_keys.iter().map(|k| quote! { #k });

    Ok(quote! {
        #input

        impl #name {
            pub const MODULE_PATH: &'static str = #module_str;
            pub const CLASS_NAME: &'static str = #class_str;

            fn __agentry_factory(
                config: agentry_shared::AgentConfig,
            ) -> ::anyhow::Result<::std::boxed::Box<dyn agentry_shared::Agent>> {
                let agent = #name::new_agent(config)?;
                Ok(::std::boxed::Box::new(agent))
            }
        }

        agentry_shared::inventory::submit! {
            agentry_shared::AgentRegistrar {
                module_path: #module_str,
                class_name: #class_str,
                description: #description_str,
                version: #version_str,
                config_keys: &[ #(#config_keys_tokens),* ],
                sdk_seal: agentry_shared::OFFICIAL_SDK_SEAL,
                sdk_version: agentry_shared::SDK_VERSION,
                factory: #name::__agentry_factory,
            }
        }
    })
}
