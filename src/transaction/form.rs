use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    html::{
        DEBT_BADGE_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAYMENT_BADGE_STYLE,
    },
    transaction::TransactionKind,
};

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionFormData {
    pub kind: TransactionKind,
    /// The value of the transaction in đồng.
    pub amount: f64,
    pub date: Date,
    #[serde(default)]
    pub description: String,
}

pub struct TransactionFormDefaults<'a> {
    pub kind: TransactionKind,
    pub amount: Option<f64>,
    pub date: Date,
    pub description: Option<&'a str>,
    pub autofocus_amount: bool,
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let is_debt = matches!(defaults.kind, TransactionKind::Debt);
    let amount_str = defaults.amount.map(|amount| amount.to_string());

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    input
                        name="kind"
                        id="transaction-kind-debt"
                        type="radio"
                        value=(TransactionKind::Debt.as_str())
                        checked[is_debt]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-kind-debt"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Debt (they borrowed)"
                    }
                }

                div class="flex items-center gap-3"
                {
                    input
                        name="kind"
                        id="transaction-kind-payment"
                        type="radio"
                        value=(TransactionKind::Payment.as_str())
                        checked[!is_debt]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-kind-payment"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Payment (they paid back)"
                    }
                }
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount (₫)"
            }

            input
                name="amount"
                id="amount"
                type="number"
                step="any"
                min="0"
                placeholder="50000"
                required
                value=[amount_str.as_deref()]
                autofocus[defaults.autofocus_amount]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// A coloured "Debt" or "Payment" label.
pub fn kind_badge(kind: TransactionKind) -> Markup {
    let style = match kind {
        TransactionKind::Debt => DEBT_BADGE_STYLE,
        TransactionKind::Payment => PAYMENT_BADGE_STYLE,
    };

    html!( span class=(style) { (kind.label()) } )
}

#[cfg(test)]
mod tests {
    use scraper::Html;
    use time::macros::date;

    use super::{TransactionFormDefaults, kind_badge, transaction_form_fields};
    use crate::{
        test_utils::{assert_form_input_with_value, assert_form_radio_checked, must_get_form},
        transaction::TransactionKind,
    };

    #[test]
    fn transaction_form_fields_checks_selected_kind() {
        let cases = [
            (TransactionKind::Debt, "debt"),
            (TransactionKind::Payment, "payment"),
        ];

        for (kind, expected) in cases {
            let html = render_fields(kind, None);
            let form = must_get_form(&html);

            assert_form_radio_checked(&form, "kind", expected);
        }
    }

    #[test]
    fn transaction_form_fields_fills_amount_and_date() {
        let html = render_fields(TransactionKind::Payment, Some(25_000.0));
        let form = must_get_form(&html);

        assert_form_input_with_value(&form, "amount", "number", "25000");
        assert_form_input_with_value(&form, "date", "date", "2025-03-05");
    }

    #[test]
    fn badge_shows_kind_label() {
        let markup = kind_badge(TransactionKind::Payment).into_string();

        assert!(markup.contains("Payment"), "got {markup:?}");
        assert!(markup.contains("bg-green-100"), "got {markup:?}");
    }

    fn render_fields(kind: TransactionKind, amount: Option<f64>) -> Html {
        let fields = transaction_form_fields(&TransactionFormDefaults {
            kind,
            amount,
            date: date!(2025 - 03 - 05),
            description: None,
            autofocus_amount: false,
        });
        let markup = maud::html! { form { (fields) } };
        Html::parse_document(&markup.into_string())
    }
}
