//! Landmark classification: deciding which lines are distinctive enough
//! to search for across a whole file.
//!
//! Searching for a line like `};` would drown the report in spurious
//! matches, so the fuzzy relocation pass only runs on lines judged likely
//! to be unique. The judgement is file-type specific: what counts as
//! distinctive in a C source file differs from a device-tree overlay or
//! a Makefile.

use crate::text;

/// The file classes with dedicated landmark rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    /// `.c` / `.h`
    CSource,
    /// `.S` / `.inc`
    Assembly,
    /// `.dts` / `.dtsi`
    DeviceTree,
    /// `Kconfig*`
    Kconfig,
    /// `Makefile*`
    Makefile,
    /// Anything else.
    Generic,
}

impl FileKind {
    /// Classifies a path by the file name component.
    ///
    /// ```
    /// # use patchcheck_core::FileKind;
    /// assert_eq!(FileKind::from_path("drivers/iio/adc.c"), FileKind::CSource);
    /// assert_eq!(FileKind::from_path("drivers/iio/Kconfig.adc"), FileKind::Kconfig);
    /// ```
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path);
        if name.ends_with(".c") || name.ends_with(".h") {
            Self::CSource
        } else if name.ends_with(".S") || name.ends_with(".inc") {
            Self::Assembly
        } else if name.ends_with(".dts") || name.ends_with(".dtsi") {
            Self::DeviceTree
        } else if name.starts_with("Kconfig") {
            Self::Kconfig
        } else if name.starts_with("Makefile") {
            Self::Makefile
        } else {
            Self::Generic
        }
    }
}

/// Decides whether `line` is safe to search for in the file at `path`.
///
/// Blank lines never qualify. Any line with more than four sub-words
/// (whitespace tokens split further on `_` and `-`) qualifies regardless
/// of file type; shorter lines fall through to per-type rules that see
/// the original, un-split tokens.
///
/// ```
/// assert!(patchcheck_core::is_landmark("foo.c", "static void bar(int x)"));
/// assert!(!patchcheck_core::is_landmark("foo.c", "};"));
/// ```
#[must_use]
pub fn is_landmark(path: &str, line: &str) -> bool {
    let words = text::words(line);
    let Some(&first) = words.first() else {
        return false;
    };

    if text::subwords(&words).len() > 4 {
        return true;
    }

    match FileKind::from_path(path) {
        FileKind::CSource => c_landmark(first, &words),
        FileKind::Assembly => assembly_landmark(first),
        FileKind::DeviceTree => device_tree_landmark(first, line),
        FileKind::Kconfig => {
            matches!(first, "config" | "select" | "depends" | "source" | "menu" | "choice")
        }
        FileKind::Makefile => makefile_landmark(line, &words),
        FileKind::Generic => generic_landmark(&words),
    }
}

fn c_landmark(first: &str, words: &[&str]) -> bool {
    // Lone closers and the bare `bool` keyword recur constantly.
    if words.len() == 1 && matches!(first, "/*" | "*/" | "}" | ")" | ");" | "bool") {
        return false;
    }
    if matches!(
        first,
        "#ifdef" | "#ifndef" | "#include" | "void" | "const" | "static" | "extern" | "struct"
            | "union"
    ) {
        return true;
    }
    if ["MACHINE_", "MODULE_", "module_", "DEFINE_", "DECLARE_"]
        .iter()
        .any(|prefix| first.starts_with(prefix))
    {
        return true;
    }
    // Argument lists and pointer dereferences rarely repeat verbatim.
    words.iter().any(|word| word.contains('(') || word.contains(')') || word.contains("->"))
}

fn assembly_landmark(first: &str) -> bool {
    matches!(first, "#ifdef" | "#ifndef" | "#include" | "#if" | ".section" | ".size" | ".align")
        || first.ends_with(':')
}

const DTS_BOILERPLATE: [&str; 5] = [
    "status =",
    "#address-cells = <1>;",
    "interrupt-parent = <&intc>;",
    "#size-cells = <0>;",
    "pinctrl-names = \"default\";",
];

fn device_tree_landmark(first: &str, line: &str) -> bool {
    if matches!(first, "};" | ">;" | "/*" | "*/") {
        return false;
    }
    !DTS_BOILERPLATE.iter().any(|fragment| line.contains(fragment))
}

fn makefile_landmark(line: &str, words: &[&str]) -> bool {
    if line.starts_with("# -") {
        return false;
    }
    if line.contains("CONFIG_") {
        return true;
    }
    words.iter().any(|word| word.ends_with(':'))
}

fn generic_landmark(words: &[&str]) -> bool {
    let subwords = text::subwords(words);
    subwords.len() > 5 || subwords.iter().any(|word| word.len() > 12)
}
