//! `{placeholder}` interpolation for rule messages and fixes.

/// Values available to a message template.
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    values: Vec<(&'static str, String)>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an earlier value.
    pub fn set(mut self, key: &'static str, value: impl ToString) -> Self {
        let value = value.to_string();
        match self.values.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.values.push((key, value)),
        }
        self
    }

    /// Set `key` only if it has no value yet.
    pub fn set_default(self, key: &'static str, value: impl ToString) -> Self {
        if self.get(key).is_some() {
            self
        } else {
            self.set(key, value)
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Replace every `{key}` in `template` with its value. Unknown
/// placeholders are left as written.
pub fn render(template: &str, vars: &TemplateVars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match vars.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Integers print without a fractional part; everything else with two decimals.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}
