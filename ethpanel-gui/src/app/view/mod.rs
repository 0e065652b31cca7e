pub mod receive;
pub mod scanner;

use ethpanel::{format_ether_amount, U256};
use iced::{
    widget::{button, center, column, container, mouse_area, opaque, row, stack, text},
    Alignment, Color, Element,
};

use crate::app::state::Notice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Connect,
    Disconnect,
    RefreshBalance,
    ShowReceive,
    CloseReceive,
    DestinationEdited(String),
    AmountEdited(String),
    SubmitPayment,
    StartScan,
    StopScan,
    DismissNotice,
}

pub fn login<'a>(connecting: bool) -> Element<'a, Message> {
    center(
        column![
            text("Ethpanel").size(32),
            text("Connect an Ethereum wallet to get started"),
            button(text(if connecting {
                "Connecting..."
            } else {
                "Connect wallet"
            }))
            .padding(10)
            .on_press_maybe((!connecting).then_some(Message::Connect)),
        ]
        .spacing(20)
        .align_x(Alignment::Center),
    )
    .into()
}

/// The balance heading is hidden as long as the balance is unknown.
pub fn dashboard<'a>(
    account: &'a str,
    balance: Option<&U256>,
    refreshing: bool,
) -> Element<'a, Message> {
    center(
        column![
            text("Connected account").size(14),
            text(account).size(18),
        ]
        .push_maybe(balance.map(|balance| {
            column![
                text("Balance").size(14),
                text(format!("{} ETH", format_ether_amount(*balance))).size(28),
            ]
            .spacing(5)
            .align_x(Alignment::Center)
        }))
        .push(
            row![
                button(text("Refresh"))
                    .style(button::secondary)
                    .on_press_maybe((!refreshing).then_some(Message::RefreshBalance)),
                button(text("Receive / Pay")).on_press(Message::ShowReceive),
                button(text("Log out"))
                    .style(button::danger)
                    .on_press(Message::Disconnect),
            ]
            .spacing(10),
        )
        .spacing(20)
        .align_x(Alignment::Center),
    )
    .into()
}

pub fn notice(notice: &Notice) -> Element<Message> {
    let (title, message) = match notice {
        Notice::Info(message) => ("Success", message.clone()),
        Notice::Error { title, error } => (*title, error.to_string()),
    };
    container(
        column![
            text(title).size(20),
            text(message),
            button(text("OK")).on_press(Message::DismissNotice),
        ]
        .spacing(15),
    )
    .padding(20)
    .max_width(500)
    .style(container::rounded_box)
    .into()
}

/// Displays `content` above a darkened `base`. Clicking outside of the content
/// produces `on_blur`, if any.
pub fn modal<'a>(
    base: Element<'a, Message>,
    content: Element<'a, Message>,
    on_blur: Option<Message>,
) -> Element<'a, Message> {
    let backdrop = mouse_area(center(opaque(content)).style(|_theme| container::Style {
        background: Some(
            Color {
                a: 0.8,
                ..Color::BLACK
            }
            .into(),
        ),
        ..container::Style::default()
    }));
    let backdrop = match on_blur {
        Some(message) => backdrop.on_press(message),
        None => backdrop,
    };
    stack![base, opaque(backdrop)].into()
}
