//! Encodes a record, prints it as SOAP-encoded XML and decodes it back.

use soap_codec::{Element, Timestamp, encode_record, project, soap_record};

soap_record! {
    #[derive(Debug, Default)]
    struct Account {
        login: String => "Login",
        balance: f64 => "Balance",
        limit: Option<u32> => "Limit",
        opened: Timestamp => "Opened",
        password: String => "Password,in",
        note: String => "Note,omitempty",
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn render(element: &Element, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    out.push_str(&pad);
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in element.attributes() {
        out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
    }
    if element.children.is_empty() {
        if element.text.is_empty() {
            out.push_str("/>\n");
        } else {
            out.push_str(&format!(">{}</{}>\n", escape(&element.text), element.name));
        }
        return;
    }
    out.push_str(">\n");
    for child in &element.children {
        render(child, indent + 1, out);
    }
    out.push_str(&format!("{}</{}>\n", pad, element.name));
}

fn main() {
    let account = Account {
        login: "alice".to_string(),
        balance: 12.5,
        limit: None,
        opened: Timestamp::from_parts(2024, 1, 15, 9, 30, 0, 0, 60).expect("valid date"),
        password: "hunter2".to_string(),
        note: String::new(),
    };

    let element = encode_record("Account", &account).expect("Failed to encode");

    let mut xml = String::new();
    render(&element, 0, &mut xml);
    println!("=== Encoded ===");
    print!("{}", xml);

    let value = element.value().expect("Failed to decode");
    println!("\n=== Value ===");
    println!("{}", value);

    let mut back = Account::default();
    project(&element, &mut back, false).expect("Failed to project");
    println!("\n=== Projected (lenient) ===");
    println!("{:#?}", back);

    match project(&element, &mut Account::default(), true) {
        Ok(()) => println!("\nStrict projection succeeded"),
        Err(e) => println!("\nStrict projection failed: {}", e),
    }
}
