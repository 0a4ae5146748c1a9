use std::fs;
use std::path::Path;

use crate::error::StevedoreError;

use super::{BinSpec, ItemSpec, Problem};

pub fn load_problem(path: &Path) -> Result<Problem, StevedoreError> {
    let text = fs::read_to_string(path).map_err(|source| StevedoreError::ProblemRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_problem(&text)
}

/// Parse the whitespace-delimited problem format:
///
/// ```text
/// N K
/// w_i h_i        (N item lines)
/// W_j H_j c_j    (K bin lines)
/// ```
///
/// Blank lines are skipped; anything else after the last bin line is an
/// error. All values must be positive integers.
pub fn parse_problem(text: &str) -> Result<Problem, StevedoreError> {
    let mut rows = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (line, header) = rows.next().ok_or(StevedoreError::ProblemParse {
        line: 1,
        message: "missing 'N K' header".to_string(),
    })?;
    let header = fields(line, header, 2)?;
    let item_count = to_count(line, header[0])?;
    let bin_count = to_count(line, header[1])?;

    let mut problem = Problem::default();

    for i in 0..item_count {
        let (line, row) = rows.next().ok_or_else(|| StevedoreError::ProblemParse {
            line: text.lines().count() + 1,
            message: format!("expected {} item lines, found {}", item_count, i),
        })?;
        let values = fields(line, row, 2)?;
        let (width, height) = to_side(line, "item", values[0], values[1])?;
        problem.items.push(ItemSpec {
            width,
            height,
            rid: i as u64 + 1,
        });
    }

    for j in 0..bin_count {
        let (line, row) = rows.next().ok_or_else(|| StevedoreError::ProblemParse {
            line: text.lines().count() + 1,
            message: format!("expected {} bin lines, found {}", bin_count, j),
        })?;
        let values = fields(line, row, 3)?;
        let (width, height) = to_side(line, "bin", values[0], values[1])?;
        if values[2] == 0 {
            return Err(StevedoreError::ProblemParse {
                line,
                message: "bin cost must be positive".to_string(),
            });
        }
        problem.bins.push(BinSpec {
            width,
            height,
            cost: values[2],
            bid: j as u64 + 1,
        });
    }

    if let Some((line, _)) = rows.next() {
        return Err(StevedoreError::ProblemParse {
            line,
            message: "unexpected trailing content".to_string(),
        });
    }

    Ok(problem)
}

fn fields(line: usize, row: &str, expect: usize) -> Result<Vec<u64>, StevedoreError> {
    let tokens: Vec<&str> = row.split_whitespace().collect();
    if tokens.len() != expect {
        return Err(StevedoreError::ProblemParse {
            line,
            message: format!("expected {} fields, found {}", expect, tokens.len()),
        });
    }
    tokens
        .iter()
        .map(|token| {
            token
                .parse::<u64>()
                .map_err(|_e| StevedoreError::ProblemParse {
                    line,
                    message: format!("invalid integer '{}'", token),
                })
        })
        .collect()
}

fn to_count(line: usize, value: u64) -> Result<usize, StevedoreError> {
    usize::try_from(value).map_err(|_e| StevedoreError::ProblemParse {
        line,
        message: format!("count {} too large", value),
    })
}

fn to_side(
    line: usize,
    what: &str,
    width: u64,
    height: u64,
) -> Result<(u32, u32), StevedoreError> {
    if width == 0 || height == 0 {
        return Err(StevedoreError::ProblemParse {
            line,
            message: format!("{} dimensions must be positive", what),
        });
    }
    let convert = |value: u64| {
        u32::try_from(value).map_err(|_e| StevedoreError::ProblemParse {
            line,
            message: format!("{} side {} too large", what, value),
        })
    };
    Ok((convert(width)?, convert(height)?))
}
