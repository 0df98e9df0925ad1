//! Built-in metrics. All except `file_length` read the syntax outline and
//! measure nothing in files without a grammar.

use conform_core::errors::DetectionError;

use super::{Measurement, Metric};
use crate::scanner::SourceFile;
use crate::syntax::FunctionInfo;

fn per_function(
    file: &SourceFile,
    value: impl Fn(&FunctionInfo) -> f64,
) -> Result<Vec<Measurement>, DetectionError> {
    let Some(outline) = file.outline()? else {
        return Ok(Vec::new());
    };
    Ok(outline
        .functions
        .iter()
        .map(|f| Measurement {
            subject: f.name.clone(),
            line: Some(f.line),
            value: value(f),
        })
        .collect())
}

/// McCabe complexity per function.
pub struct CyclomaticComplexity;

impl Metric for CyclomaticComplexity {
    fn name(&self) -> &str {
        "cyclomatic_complexity"
    }

    fn measure(&self, file: &SourceFile) -> Result<Vec<Measurement>, DetectionError> {
        per_function(file, |f| f64::from(f.complexity))
    }
}

/// Lines per function, declaration to closing line.
pub struct FunctionLength;

impl Metric for FunctionLength {
    fn name(&self) -> &str {
        "function_length"
    }

    fn measure(&self, file: &SourceFile) -> Result<Vec<Measurement>, DetectionError> {
        per_function(file, |f| f64::from(f.length()))
    }
}

/// Declared parameters per function, receivers excluded.
pub struct ParameterCount;

impl Metric for ParameterCount {
    fn name(&self) -> &str {
        "parameter_count"
    }

    fn measure(&self, file: &SourceFile) -> Result<Vec<Measurement>, DetectionError> {
        per_function(file, |f| f.parameter_count as f64)
    }
}

/// Methods per class.
pub struct MethodCount;

impl Metric for MethodCount {
    fn name(&self) -> &str {
        "method_count"
    }

    fn measure(&self, file: &SourceFile) -> Result<Vec<Measurement>, DetectionError> {
        let Some(outline) = file.outline()? else {
            return Ok(Vec::new());
        };
        Ok(outline
            .classes
            .iter()
            .map(|c| Measurement {
                subject: c.name.clone(),
                line: Some(c.line),
                value: c.method_count as f64,
            })
            .collect())
    }
}

/// Line count of the whole file. Works for any text file.
pub struct FileLength;

impl Metric for FileLength {
    fn name(&self) -> &str {
        "file_length"
    }

    fn measure(&self, file: &SourceFile) -> Result<Vec<Measurement>, DetectionError> {
        Ok(vec![Measurement {
            subject: file.display_path().to_string(),
            line: None,
            value: file.line_count() as f64,
        }])
    }
}
