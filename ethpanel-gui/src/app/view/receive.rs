use iced::{
    widget::{
        button, column, container,
        qr_code::{self, QRCode},
        row, text, text_input,
    },
    Alignment, Element,
};

use super::Message;
use crate::app::state::PaymentForm;

/// The combined receive and pay overlay.
pub fn receive<'a>(
    address: &'a str,
    qr_code: Option<&'a qr_code::Data>,
    payment: &'a PaymentForm,
    paying: bool,
    qr_cell_size: u16,
) -> Element<'a, Message> {
    let code: Element<'a, Message> = match qr_code {
        Some(data) => QRCode::<iced::Theme>::new(data)
            .cell_size(qr_cell_size)
            .into(),
        None => text("QR code unavailable").into(),
    };
    container(
        column![
            text("Receive").size(20),
            code,
            text(address).size(14),
            text("Pay").size(20),
            row![
                text_input("Payment address", &payment.destination)
                    .on_input(Message::DestinationEdited)
                    .padding(10),
                button(text("Scan"))
                    .style(button::secondary)
                    .padding(10)
                    .on_press(Message::StartScan),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
            text_input("Amount (ETH)", &payment.amount)
                .on_input(Message::AmountEdited)
                .padding(10),
            row![
                button(text("Close"))
                    .style(button::secondary)
                    .on_press(Message::CloseReceive),
                button(text(if paying {
                    "Sending..."
                } else {
                    "Confirm payment"
                }))
                .on_press_maybe((!paying).then_some(Message::SubmitPayment)),
            ]
            .spacing(10),
        ]
        .spacing(15)
        .align_x(Alignment::Center),
    )
    .padding(20)
    .max_width(600)
    .style(container::rounded_box)
    .into()
}
