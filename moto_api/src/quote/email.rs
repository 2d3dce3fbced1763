use moto_pricing::aggregator::Quote;
use moto_pricing::money::Pesos;

use super::send::Customer;

/// The rendering contract is a flat key/value substitution; the template
/// never sees the domain types.
const QUOTE_EMAIL_TEMPLATE: &str = "\
<h2>Moto Express</h2>
<p>Hi {name},</p>
<p>Thanks for asking for a quote. Here is the breakdown for your delivery:</p>
<p>From <strong>{origin}</strong> to <strong>{stops}</strong><br>
Distance: {distance_km} km, about {duration_minutes} minutes on the road.</p>
<table>
  <tr><td>Net</td><td>{net}</td></tr>
  {discount_row}
  <tr><td>IVA (19%)</td><td>{tax}</td></tr>
  <tr><td><strong>Total</strong></td><td><strong>{total}</strong></td></tr>
</table>
{fallback_note}
<p>{response_time}</p>
<p>Moto Express</p>
";

pub fn render_quote(customer: &Customer, quote: &Quote) -> String {
    let stops = quote
        .legs
        .iter()
        .map(|leg| leg.to.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let discount_row = if quote.price.discount_amount > Pesos::ZERO {
        format!(
            "<tr><td>{}</td><td>-{}</td></tr>",
            quote.price.discount_label,
            format_clp(quote.price.discount_amount)
        )
    } else {
        String::new()
    };

    let fallback_note = if quote.used_fallback {
        "<p>The distance shown is an estimate; a rider will confirm the final price.</p>"
    } else {
        ""
    };

    let values = [
        ("name", customer.name.trim().to_string()),
        ("phone", customer.phone.clone().unwrap_or_default()),
        ("origin", quote.origin.clone()),
        ("stops", stops),
        ("distance_km", format!("{:.1}", quote.total_distance.value())),
        (
            "duration_minutes",
            quote.total_duration_minutes.to_string(),
        ),
        ("net", format_clp(quote.price.net)),
        ("discount_row", discount_row),
        ("tax", format_clp(quote.price.tax)),
        ("total", format_clp(quote.price.total)),
        ("fallback_note", fallback_note.to_string()),
        ("response_time", response_time_message().to_string()),
    ];

    render(QUOTE_EMAIL_TEMPLATE, &values)
}

fn render(template: &str, values: &[(&str, String)]) -> String {
    let mut rendered = template.to_string();
    for (key, value) in values {
        rendered = rendered.replace(&format!("{{{key}}}"), value);
    }
    rendered
}

/// Rough promise of when a rider answers, from the local hour.
fn response_time_message() -> &'static str {
    match jiff::Zoned::now().hour() {
        8..=20 => "A rider will confirm your quote within 30 minutes.",
        _ => "We received your request outside business hours; a rider will confirm it first thing in the morning.",
    }
}

/// Dot-grouped whole pesos: 13655 renders as `$13.655`.
fn format_clp(amount: Pesos) -> String {
    let digits = amount.value().abs().to_string();
    let mut grouped = String::new();
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if amount.value() < 0 { "-" } else { "" };
    format!("${sign}{grouped}")
}
