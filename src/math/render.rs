use std::fmt;

use crate::math::matrix::Matrix;

impl Matrix {
    /// Row-major text dump: each row on its own line prefixed by `prefix`,
    /// entries with three decimals, a leading space for non-negative values,
    /// and a blank line at the end.
    pub fn render(&self, prefix: &str) -> String {
        let mut out = String::new();
        for i in 0..self.rows() {
            out.push_str(prefix);
            for j in 0..self.cols() {
                let datum = self[(i, j)];
                if !datum.is_sign_negative() {
                    out.push(' ');
                }
                out.push_str(&format!("{datum:.3}, "));
            }
            out.push('\n');
        }
        out.push('\n');
        out
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}
