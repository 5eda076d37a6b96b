// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// ---
// Dashboard financeiro
// ---
// Todas as somas usam Decimal exato: valores monetários exibidos ao usuário
// precisam sobreviver à formatação sem deriva de arredondamento binário.

/// Uma linha por fatura FINALIZADA: total, pago e custo de aquisição dos
/// dispositivos vinculados (NULL quando a fatura não tem dispositivo).
#[derive(Debug, Clone, FromRow)]
pub struct InvoiceFinanceRow {
    pub total_amount: Decimal,
    pub amount_paid: Decimal,
    pub device_cost: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinanceDashboard {
    #[schema(example = "1500.00")]
    pub total_revenue: Decimal,

    #[schema(example = "800.00")]
    pub total_cost: Decimal,

    #[schema(example = "700.00")]
    pub total_profit: Decimal,

    #[schema(example = "500.00")]
    pub total_collected: Decimal,

    #[schema(example = "1000.00")]
    pub total_outstanding: Decimal,

    pub invoice_count: i64,
}

impl FinanceDashboard {
    /// Dobra pura sobre as linhas buscadas pelo repositório — determinística
    /// para um conjunto fixo de dados.
    pub fn from_rows(rows: &[InvoiceFinanceRow], total_outstanding: Decimal) -> Self {
        let mut total_revenue = Decimal::ZERO;
        let mut total_cost = Decimal::ZERO;
        let mut total_collected = Decimal::ZERO;

        for row in rows {
            total_revenue += row.total_amount;
            // Fatura sem dispositivo vinculado contribui custo 0, não erro.
            total_cost += row.device_cost.unwrap_or(Decimal::ZERO);
            total_collected += row.amount_paid;
        }

        Self {
            total_revenue,
            total_cost,
            total_profit: total_revenue - total_cost,
            total_collected,
            total_outstanding,
            invoice_count: rows.len() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn row(total: &str, paid: &str, cost: Option<&str>) -> InvoiceFinanceRow {
        InvoiceFinanceRow {
            total_amount: dec(total),
            amount_paid: dec(paid),
            device_cost: cost.map(dec),
        }
    }

    #[test]
    fn worked_example_is_deterministic() {
        // Duas faturas de 1000.00 e 500.00, dispositivos de 600.00 e 200.00.
        let rows = vec![
            row("1000.00", "1000.00", Some("600.00")),
            row("500.00", "250.00", Some("200.00")),
        ];
        let dash = FinanceDashboard::from_rows(&rows, dec("250.00"));

        assert_eq!(dash.total_revenue, dec("1500.00"));
        assert_eq!(dash.total_cost, dec("800.00"));
        assert_eq!(dash.total_profit, dec("700.00"));
        assert_eq!(dash.total_collected, dec("1250.00"));
        assert_eq!(dash.total_outstanding, dec("250.00"));
        assert_eq!(dash.invoice_count, 2);
    }

    #[test]
    fn invoice_without_device_contributes_zero_cost() {
        let rows = vec![row("300.00", "0", None)];
        let dash = FinanceDashboard::from_rows(&rows, Decimal::ZERO);

        assert_eq!(dash.total_cost, Decimal::ZERO);
        assert_eq!(dash.total_profit, dec("300.00"));
    }

    #[test]
    fn empty_dataset_yields_zeroes() {
        let dash = FinanceDashboard::from_rows(&[], Decimal::ZERO);
        assert_eq!(dash.total_revenue, Decimal::ZERO);
        assert_eq!(dash.total_profit, Decimal::ZERO);
        assert_eq!(dash.invoice_count, 0);
    }

    #[test]
    fn cents_do_not_drift() {
        // Somas de centavos que em f64 acumulariam erro binário.
        let rows: Vec<_> = (0..10).map(|_| row("0.10", "0.10", Some("0.01"))).collect();
        let dash = FinanceDashboard::from_rows(&rows, Decimal::ZERO);

        assert_eq!(dash.total_revenue, dec("1.00"));
        assert_eq!(dash.total_cost, dec("0.10"));
        assert_eq!(dash.total_profit, dec("0.90"));
    }
}
