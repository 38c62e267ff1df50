use chrono::{Datelike, Months, NaiveDate};

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Period {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Period {
    /// The calendar month `date` falls in
    pub fn calendar_month(date: &NaiveDate) -> Result<Period, String> {
        Ok(Period {
            start_date: date.with_day(1).ok_or("Could not compute the first day of the month")?,
            end_date: (|| {
                let next_month = date.with_day(1)? + Months::new(1);
                next_month.pred_opt()
            })()
            .ok_or("Could not compute the last day of the month")?,
        })
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.start_date <= *date && *date <= self.end_date
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod calendar_month_tests {
    use crate::period::Period;
    use chrono::NaiveDate;
    use derive_builder::Builder;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, month, day).unwrap()
    }

    fn date_bisextile(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    #[derive(Builder)]
    #[builder(pattern = "immutable", build_fn(skip), name = "Test")]
    #[allow(dead_code)]
    struct CalendarMonthCase {
        input: NaiveDate,
        expected_output: Period,
    }

    impl Test {
        fn execute(self) {
            let input = self.input.expect("input is set");
            let result = Period::calendar_month(&input).unwrap();
            assert_eq!(result, self.expected_output.expect("expected output is set"));
            assert!(result.contains(&input));
        }
    }

    fn thirty_days() -> Test {
        Test::default().expected_output(Period { start_date: date(4, 1), end_date: date(4, 30) })
    }

    #[test]
    fn thirty_days__beginning_of_month() {
        thirty_days().input(date(4, 1)).execute();
    }

    #[test]
    fn thirty_days__end_of_month() {
        thirty_days().input(date(4, 30)).execute();
    }

    fn thirty_one_days() -> Test {
        Test::default().expected_output(Period { start_date: date(5, 1), end_date: date(5, 31) })
    }

    #[test]
    fn thirty_one_days__mid_month() {
        thirty_one_days().input(date(5, 15)).execute();
    }

    #[test]
    fn thirty_one_days__end_of_month() {
        thirty_one_days().input(date(5, 31)).execute();
    }

    #[test]
    fn end_of_year__end_of_month() {
        Test::default()
            .expected_output(Period { start_date: date(12, 1), end_date: date(12, 31) })
            .input(date(12, 31))
            .execute();
    }

    #[test]
    fn february_28__mid_month() {
        Test::default()
            .expected_output(Period { start_date: date(2, 1), end_date: date(2, 28) })
            .input(date(2, 15))
            .execute();
    }

    #[test]
    fn february_29__end_of_month() {
        Test::default()
            .expected_output(Period { start_date: date_bisextile(2, 1), end_date: date_bisextile(2, 29) })
            .input(date_bisextile(2, 29))
            .execute();
    }

    #[test]
    fn contains__bounds() {
        let april = Period::calendar_month(&date(4, 10)).unwrap();
        assert!(april.contains(&date(4, 1)));
        assert!(april.contains(&date(4, 30)));
        assert!(!april.contains(&date(3, 31)));
        assert!(!april.contains(&date(5, 1)));
        assert!(!april.contains(&date_bisextile(4, 10)));
    }
}
