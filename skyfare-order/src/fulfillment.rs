use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use skyfare_core::FlightOffer;
use skyfare_shared::money::split_share;
use skyfare_shared::{Amount, CURRENCY};
use crate::models::BookingRecord;

/// Everything a ticket needs. The flight is a full snapshot, never an identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketData {
    pub booking_reference: String,
    pub passenger_name: String,
    pub flight: FlightOffer,
    pub price: Amount,
    pub booking_date: DateTime<Utc>,
}

impl From<&BookingRecord> for TicketData {
    fn from(record: &BookingRecord) -> Self {
        Self {
            booking_reference: record.reference.clone(),
            passenger_name: record.passenger.name.clone(),
            flight: record.flight.clone(),
            price: record.price,
            booking_date: record.booking_date,
        }
    }
}

/// Total split into the base fare (80%) and taxes & fees shown on the ticket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FareBreakdown {
    pub base_fare: Amount,
    pub taxes_and_fees: Amount,
    pub total: Amount,
}

impl FareBreakdown {
    pub fn from_total(total: Amount) -> Self {
        let (base_fare, taxes_and_fees) = split_share(total, Decimal::new(8, 1));
        Self {
            base_fare,
            taxes_and_fees,
            total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketField {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketSection {
    pub heading: String,
    pub fields: Vec<TicketField>,
}

/// Printable ticket content, independent of how it is finally presented.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketDocument {
    pub title: String,
    pub barcode: String,
    pub fare: FareBreakdown,
    pub sections: Vec<TicketSection>,
}

fn field(label: &str, value: impl Into<String>) -> TicketField {
    TicketField {
        label: label.to_string(),
        value: value.into(),
    }
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%d %b, %Y").to_string()
}

fn format_time(at: DateTime<Utc>) -> String {
    at.format("%I:%M %p").to_string()
}

fn format_amount(amount: Amount) -> String {
    format!("{} {:.2}", CURRENCY, amount)
}

/// Build the ticket for a booking. Pure: no I/O, same input same document.
pub fn render_ticket(data: &TicketData) -> TicketDocument {
    let flight = &data.flight;
    let fare = FareBreakdown::from_total(data.price);

    let sections = vec![
        TicketSection {
            heading: "Passenger".to_string(),
            fields: vec![field("Name", data.passenger_name.clone())],
        },
        TicketSection {
            heading: "Flight".to_string(),
            fields: vec![
                field("Airline", flight.airline.clone()),
                field("Flight Number", flight.flight_number.clone()),
                field("Aircraft", flight.aircraft.clone()),
                field("Stops", flight.stops_label()),
            ],
        },
        TicketSection {
            heading: "Route".to_string(),
            fields: vec![
                field(
                    "From",
                    format!("{} ({}), {}", flight.origin.city, flight.origin.code, flight.origin.name),
                ),
                field(
                    "Departure",
                    format!("{} {}", format_date(flight.departure_time), format_time(flight.departure_time)),
                ),
                field(
                    "To",
                    format!(
                        "{} ({}), {}",
                        flight.destination.city, flight.destination.code, flight.destination.name
                    ),
                ),
                field(
                    "Arrival",
                    format!("{} {}", format_date(flight.arrival_time), format_time(flight.arrival_time)),
                ),
                field("Duration", flight.duration_label()),
            ],
        },
        TicketSection {
            heading: "Payment".to_string(),
            fields: vec![
                field("Booking Date", format_date(data.booking_date)),
                field("Base Fare", format_amount(fare.base_fare)),
                field("Taxes & Fees", format_amount(fare.taxes_and_fees)),
                field("Total Paid", format_amount(fare.total)),
                field("Payment Method", "Wallet"),
            ],
        },
    ];

    TicketDocument {
        title: format!("Flight Ticket - {}", data.booking_reference),
        barcode: format!("{}{}", data.booking_reference, flight.flight_number),
        fare,
        sections,
    }
}

impl TicketDocument {
    pub fn to_text(&self) -> String {
        let mut out = format!("{}\n", self.title);
        for section in &self.sections {
            out.push_str(&format!("\n[{}]\n", section.heading));
            for f in &section.fields {
                out.push_str(&format!("{}: {}\n", f.label, f.value));
            }
        }
        out.push_str(&format!("\n{}\n", self.barcode));
        out
    }

    pub fn to_html(&self) -> String {
        let mut body = String::new();
        for section in &self.sections {
            body.push_str(&format!("<section><h2>{}</h2><dl>", escape_html(&section.heading)));
            for f in &section.fields {
                body.push_str(&format!(
                    "<dt>{}</dt><dd>{}</dd>",
                    escape_html(&f.label),
                    escape_html(&f.value)
                ));
            }
            body.push_str("</dl></section>");
        }

        format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
             <body><div class=\"ticket\"><h1>{title}</h1>{body}<div class=\"barcode\">{barcode}</div></div></body></html>",
            title = escape_html(&self.title),
            body = body,
            barcode = escape_html(&self.barcode),
        )
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
