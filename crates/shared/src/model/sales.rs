use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// One confirmed reservation feeding the settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SalesRow {
    pub reservation_id: i64,
    pub class_id: i64,
    pub class_name: String,
    pub lesson_date: NaiveDate,
    pub total_price: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthlySales {
    pub month: u32,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClassMonthlySales {
    pub class_id: i64,
    pub class_name: String,
    pub month: u32,
    pub amount: i64,
}

/// Yearly sales of one tutor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SalesAggregate {
    pub tutor_id: i64,
    pub year: i32,
    /// Always twelve entries, January first.
    pub monthly: Vec<MonthlySales>,
    /// Ordered by class id, then month.
    pub by_class: Vec<ClassMonthlySales>,
    pub grand_total: i64,
}

impl SalesAggregate {
    pub fn empty(tutor_id: i64, year: i32) -> Self {
        Self::from_rows(tutor_id, year, &[])
    }

    /// Recomputes the aggregate from scratch. Rows dated outside `year`
    /// are ignored.
    pub fn from_rows(tutor_id: i64, year: i32, rows: &[SalesRow]) -> Self {
        let mut monthly: Vec<MonthlySales> = (1..=12)
            .map(|month| MonthlySales { month, amount: 0 })
            .collect();
        let mut by_class: BTreeMap<(i64, u32), ClassMonthlySales> = BTreeMap::new();
        let mut grand_total = 0;

        for row in rows.iter().filter(|r| r.lesson_date.year() == year) {
            let month = row.lesson_date.month();
            monthly[(month - 1) as usize].amount += row.total_price;
            grand_total += row.total_price;

            by_class
                .entry((row.class_id, month))
                .or_insert_with(|| ClassMonthlySales {
                    class_id: row.class_id,
                    class_name: row.class_name.clone(),
                    month,
                    amount: 0,
                })
                .amount += row.total_price;
        }

        Self {
            tutor_id,
            year,
            monthly,
            by_class: by_class.into_values().collect(),
            grand_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, class_id: i64, month: u32, price: i64) -> SalesRow {
        SalesRow {
            reservation_id: id,
            class_id,
            class_name: format!("class-{class_id}"),
            lesson_date: NaiveDate::from_ymd_opt(2024, month, 15).unwrap(),
            total_price: price,
        }
    }

    #[test]
    fn empty_year_has_twelve_zero_months() {
        let agg = SalesAggregate::empty(1, 2024);
        assert_eq!(agg.monthly.len(), 12);
        assert!(agg.monthly.iter().all(|m| m.amount == 0));
        assert_eq!(agg.monthly[0].month, 1);
        assert_eq!(agg.monthly[11].month, 12);
        assert!(agg.by_class.is_empty());
        assert_eq!(agg.grand_total, 0);
    }

    #[test]
    fn groups_by_month_and_class() {
        let rows = vec![
            row(1, 20, 3, 10000),
            row(2, 10, 3, 5000),
            row(3, 10, 3, 5000),
            row(4, 10, 7, 30000),
        ];
        let agg = SalesAggregate::from_rows(9, 2024, &rows);

        assert_eq!(agg.monthly[2].amount, 20000);
        assert_eq!(agg.monthly[6].amount, 30000);
        assert_eq!(agg.grand_total, 50000);

        let keys: Vec<(i64, u32, i64)> = agg
            .by_class
            .iter()
            .map(|c| (c.class_id, c.month, c.amount))
            .collect();
        assert_eq!(keys, vec![(10, 3, 10000), (10, 7, 30000), (20, 3, 10000)]);
    }

    #[test]
    fn ignores_rows_from_other_years() {
        let mut stray = row(5, 10, 1, 99999);
        stray.lesson_date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let agg = SalesAggregate::from_rows(9, 2024, &[stray, row(6, 10, 1, 100)]);
        assert_eq!(agg.grand_total, 100);
    }

    #[test]
    fn recomputation_is_stable() {
        let rows = vec![row(1, 10, 2, 1000), row(2, 11, 2, 2000)];
        assert_eq!(
            SalesAggregate::from_rows(1, 2024, &rows),
            SalesAggregate::from_rows(1, 2024, &rows)
        );
    }
}
