/// Extract a short type name from the full module path.
///
/// Given `"my_crate::some_module::MyType"`, returns `"MyType"`.
pub fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}

/// Format an amount rounded to whole units with comma thousands separators.
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round();
    let whole = rounded.abs() as u64;
    let sign = if rounded < 0.0 { "-" } else { "" };

    if whole < 1_000 {
        return format!("{}{}", sign, whole);
    }

    let s = whole.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    format!("{}{}", sign, result.chars().rev().collect::<String>())
}

/// Sort and dedup identifier values. When every value is an integer they
/// sort numerically (`2` before `10`), otherwise lexicographically.
pub fn sorted_distinct<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = values.into_iter().map(str::to_string).collect();
    let numeric = out.iter().all(|v| v.parse::<i64>().is_ok());
    if numeric {
        out.sort_by_key(|v| (v.parse::<i64>().unwrap_or_default(), v.clone()));
    } else {
        out.sort();
    }
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_thousands() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.4), "999");
        assert_eq!(format_amount(1234.5), "1,235");
        assert_eq!(format_amount(1_234_567.0), "1,234,567");
        assert_eq!(format_amount(-45_000.0), "-45,000");
    }

    #[test]
    fn numeric_ids_sort_numerically() {
        assert_eq!(sorted_distinct(["10", "2", "2", "1"]), vec!["1", "2", "10"]);
        assert_eq!(sorted_distinct(["WH-2", "WH-10", "WH-1"]), vec!["WH-1", "WH-10", "WH-2"]);
    }

    #[test]
    fn short_name_strips_path() {
        assert_eq!(short_type_name("warehouse_pipeline::components::WarehouseFilter"), "WarehouseFilter");
    }
}
