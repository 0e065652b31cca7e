use iced::{
    widget::{button, center, column, container, text},
    Alignment, Element, Length,
};

use super::Message;
use crate::code::ScanConfig;

pub fn scanner<'a>(config: &ScanConfig) -> Element<'a, Message> {
    let side = Length::Fixed(config.qrbox as f32);
    container(
        column![
            text("Scan a payment address").size(20),
            center(text("Point the camera at a QR code"))
                .width(side)
                .height(side)
                .style(container::rounded_box),
            button(text("Close"))
                .style(button::secondary)
                .on_press(Message::StopScan),
        ]
        .spacing(15)
        .align_x(Alignment::Center),
    )
    .padding(20)
    .style(container::rounded_box)
    .into()
}
