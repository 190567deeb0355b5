//! Build a request with a function definition, encode it, and decode it back.
//!
//! Usage:
//!   `cargo run --example build_request`

use chat_query::{
    decode_request, encode_request, ChatRequest, FunctionCallDirective, FunctionSpec, Message,
};
use serde_json::json;

fn main() {
    let parameters = json!({
        "type": "object",
        "properties": {
            "query": {"type": "string", "description": "Search terms"},
            "limit": {"type": "integer", "minimum": 1}
        },
        "required": ["query"]
    });

    let req = ChatRequest::new(
        "gpt-3.5-turbo",
        vec![
            Message::system("You look things up before answering."),
            Message::user("Who maintains serde?"),
        ],
    )
    .with_functions(vec![FunctionSpec::new("search")
        .with_description("Search the web")
        .with_parameters(parameters.as_object().cloned().unwrap_or_default())])
    .with_function_call(FunctionCallDirective::named("search"))
    .with_temperature(0.2);

    let body = encode_request(&req);
    println!("=== Encoded request ===");
    println!("{}", String::from_utf8_lossy(&body));

    // The dispatcher flips the stream flag after construction.
    let streaming = req.clone().into_streaming();
    println!();
    println!("=== Streaming variant ===");
    println!("{}", String::from_utf8_lossy(&encode_request(&streaming)));

    match decode_request(&body) {
        Ok(back) => {
            println!();
            println!("Round-trip equal: {}", back == req);
        }
        Err(e) => eprintln!("decode failed: {e}"),
    }
}
