use crate::check::Error;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::{self, SimpleFile};
use codespan_reporting::term::{self, termcolor::NoColor};

impl Error {
    /// A diagnostic labelled with the location of the error, if it has one.
    pub fn to_diagnostic(&self) -> Diagnostic<()> {
        let error = self.unwrapped();
        let diagnostic = Diagnostic::error().with_message(error.to_string());
        match self.loc().filter(|loc| loc.end > loc.start) {
            Some(loc) => diagnostic.with_labels(vec![Label::primary((), loc.range())]),
            None => diagnostic,
        }
    }

    /// Render the error against the source it was reported for.
    pub fn report(&self, name: &str, source: &str) -> Result<String, files::Error> {
        let file = SimpleFile::new(name, source);
        let mut out = NoColor::new(Vec::new());
        term::emit(&mut out, &term::Config::default(), &file, &self.to_diagnostic())?;
        Ok(String::from_utf8_lossy(&out.into_inner()).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Loc;

    #[test]
    fn labels_the_equation() -> eyre::Result<()> {
        let source = "f zero := zero\nf zero := succ zero\n";
        let error = Error::RedundantEquation {
            equation: 1,
            loc: Loc::new(15, 34),
        };
        let report = error.report("f.eq", source)?;
        assert!(report.contains("Equation 1 is redundant"), "{}", report);
        assert!(report.contains("f.eq:2:1"), "{}", report);
        Ok(())
    }

    #[test]
    fn no_label_without_location() {
        let error = Error::UnknownDecl(3);
        assert!(error.to_diagnostic().labels.is_empty());
    }
}
