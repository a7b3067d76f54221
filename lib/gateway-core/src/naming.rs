//! RPC method name mangling
//!
//! Camel-case method names are split before every ASCII uppercase letter
//! except the first character, then lowercased.

/// `SayHello` -> `say/hello`
pub fn rpc_method_to_http_path(method_name: &str) -> String {
    split_camel_case(method_name, '/')
}

/// `SayHello` -> `say_hello`, used for metric and event names
pub fn rpc_method_to_snake(method_name: &str) -> String {
    split_camel_case(method_name, '_')
}

fn split_camel_case(name: &str, separator: char) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            out.push(separator);
        }
        out.extend(c.to_lowercase());
    }
    out
}
