use ethpanel::{parse_ether_amount, U256};
use iced::widget::qr_code;
use iced::Element;
use tracing::error;

use crate::{
    app::{error::Error, view},
    code::CodeGenerator,
};

/// The receive address of the connected account and its QR code.
pub struct ReceivePanel {
    address: String,
    qr_code: Option<qr_code::Data>,
}

impl ReceivePanel {
    /// The panel is still shown with the textual address if the code cannot be generated.
    pub fn new(address: String, codes: &dyn CodeGenerator) -> Self {
        let qr_code = match codes.encode(&address) {
            Ok(data) => Some(data),
            Err(e) => {
                error!("{}", e);
                None
            }
        };
        Self { address, qr_code }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn has_qr_code(&self) -> bool {
        self.qr_code.is_some()
    }

    pub fn view<'a>(
        &'a self,
        payment: &'a PaymentForm,
        paying: bool,
        qr_cell_size: u16,
    ) -> Element<'a, view::Message> {
        view::receive::receive(
            &self.address,
            self.qr_code.as_ref(),
            payment,
            paying,
            qr_cell_size,
        )
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PaymentForm {
    pub destination: String,
    pub amount: String,
}

impl PaymentForm {
    /// Returns the trimmed destination and the amount in wei.
    pub fn validate(&self) -> Result<(String, U256), Error> {
        let destination = self.destination.trim();
        let amount = self.amount.trim();
        if destination.is_empty() || amount.is_empty() {
            return Err(Error::UserInput(
                "Please enter a valid payment address and amount".to_string(),
            ));
        }
        let value = parse_ether_amount(amount)
            .map_err(|e| Error::UserInput(format!("Invalid amount: {}", e)))?;
        Ok((destination.to_string(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{CodeError, QrGenerator};

    #[derive(Debug)]
    struct BrokenGenerator;

    impl CodeGenerator for BrokenGenerator {
        fn encode(&self, _text: &str) -> Result<qr_code::Data, CodeError> {
            Err(CodeError("data too long".to_string()))
        }
    }

    #[test]
    fn receive_panel_qr_code() {
        let panel = ReceivePanel::new("0xabc".to_string(), &QrGenerator);
        assert_eq!(panel.address(), "0xabc");
        assert!(panel.has_qr_code());

        let panel = ReceivePanel::new("0xabc".to_string(), &BrokenGenerator);
        assert_eq!(panel.address(), "0xabc");
        assert!(!panel.has_qr_code());
    }

    #[test]
    fn validate_payment_form() {
        let form = |destination: &str, amount: &str| PaymentForm {
            destination: destination.to_string(),
            amount: amount.to_string(),
        };

        assert!(matches!(
            form("", "1.0").validate(),
            Err(Error::UserInput(_))
        ));
        assert!(matches!(
            form("0xabc", "").validate(),
            Err(Error::UserInput(_))
        ));
        assert!(matches!(
            form("   ", " ").validate(),
            Err(Error::UserInput(_))
        ));
        assert_eq!(
            form("0xabc", "one").validate(),
            Err(Error::UserInput(
                "Invalid amount: Invalid character 'o' in amount".to_string()
            ))
        );
        assert_eq!(
            form(" 0xabc ", "1.5").validate(),
            Ok((
                "0xabc".to_string(),
                U256::from(1_500_000_000_000_000_000u128)
            ))
        );
    }
}
