pub mod json;
pub mod table;
pub mod viz;

pub const NA: &str = "NA";
pub const LIST_SEP: &str = "|";

/// Plain decimal down to 1e-4, scientific notation below that.
pub fn format_p(v: f64) -> String {
    if v != 0.0 && v.abs() < 1e-4 {
        format!("{:e}", v)
    } else {
        format!("{}", v)
    }
}

pub fn join_list(values: &[String]) -> String {
    if values.is_empty() {
        return NA.to_string();
    }
    values.join(LIST_SEP)
}

pub fn join_optional(values: Option<&[String]>) -> String {
    match values {
        Some(v) => join_list(v),
        None => NA.to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
