//! Language packaging options (`java_package`, `csharp_namespace`, ...).
//!
//! Options are compared per package across every file of the package, since
//! generated code is organized per package rather than per file. A value that
//! only follows the package's version bump (`Google\Cloud\V1` to
//! `Google\Cloud\V1beta1` alongside `google.cloud.v1` to `google.cloud.v1beta1`)
//! is expected and not reported.

use crate::descriptor::{FILE_OPTIONS, File};
use crate::findings::{Finding, FindingCategory, FindingContainer, Location};
use crate::version::{
    equal_ignoring_version, equal_ignoring_version_case, package_version, replace_version,
};
use protobuf::descriptor::FileOptions;
use std::collections::BTreeMap;

/// How a changed value of an option is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionPolicy {
    /// A namespace-like value: an unexpected difference is a CHANGE.
    Namespace,
    /// A value that must stay as is: any difference is a REMOVAL.
    Exact,
}

#[derive(Debug)]
pub struct PackagingOption {
    pub name: &'static str,
    /// Field number in `google.protobuf.FileOptions`.
    pub field_number: i32,
    pub policy: OptionPolicy,
    extract: fn(&FileOptions) -> Option<&str>,
}

impl PackagingOption {
    /// The option's value in `options`; empty values count as unset.
    pub fn value<'o>(&self, options: &'o FileOptions) -> Option<&'o str> {
        (self.extract)(options).filter(|value| !value.is_empty())
    }
}

macro_rules! packaging_options {
    ($(($name:ident, $number:expr, $policy:ident)),* $(,)?) => {
        mod extract {
            use protobuf::descriptor::FileOptions;

            $(
                pub(super) fn $name(options: &FileOptions) -> Option<&str> {
                    options.$name.as_deref()
                }
            )*
        }

        /// Every packaging option that is compared.
        pub const PACKAGING_OPTIONS: &[PackagingOption] = &[
            $(
                PackagingOption {
                    name: stringify!($name),
                    field_number: $number,
                    policy: OptionPolicy::$policy,
                    extract: extract::$name,
                },
            )*
        ];
    };
}

packaging_options![
    (java_package, 1, Namespace),
    (java_outer_classname, 8, Exact),
    (go_package, 11, Namespace),
    (objc_class_prefix, 36, Exact),
    (csharp_namespace, 37, Namespace),
    (swift_prefix, 39, Exact),
    (php_class_prefix, 40, Exact),
    (php_namespace, 41, Namespace),
    (php_metadata_namespace, 44, Namespace),
    (ruby_package, 45, Namespace),
];

/// Package version before and after the update.
#[derive(Debug, Clone, Copy)]
struct VersionBump<'a> {
    from: Option<&'a str>,
    to: Option<&'a str>,
}

impl VersionBump<'_> {
    fn moved(&self) -> bool {
        match (self.from, self.to) {
            (Some(from), Some(to)) => !from.eq_ignore_ascii_case(to),
            (None, None) => false,
            _ => true,
        }
    }

    /// The value an option should have after the update if it follows the bump.
    fn expected(&self, value: &str) -> String {
        match (self.from, self.to) {
            (Some(from), Some(to)) if self.moved() => replace_version(value, from, to),
            _ => value.to_string(),
        }
    }
}

/// Compares the packaging options of one package group: all original files
/// of a package against all updated files of its counterpart package.
pub struct PackagingOptionsComparator<'a> {
    original: Vec<&'a File<'a>>,
    update: Vec<&'a File<'a>>,
}

impl<'a> PackagingOptionsComparator<'a> {
    pub fn new(original: Vec<&'a File<'a>>, update: Vec<&'a File<'a>>) -> Self {
        Self { original, update }
    }

    pub fn compare(&self, findings: &mut FindingContainer) {
        let (Some(original), Some(update)) = (self.original.first(), self.update.first()) else {
            return;
        };
        let bump = VersionBump {
            from: package_version(original.package()),
            to: package_version(update.package()),
        };
        for option in PACKAGING_OPTIONS {
            self.compare_option(
                option,
                values(option, &self.original),
                values(option, &self.update),
                bump,
                findings,
            );
        }
    }

    fn compare_option(
        &self,
        option: &PackagingOption,
        original: BTreeMap<&'a str, &'a File<'a>>,
        mut update: BTreeMap<&'a str, &'a File<'a>>,
        bump: VersionBump<'_>,
        findings: &mut FindingContainer,
    ) {
        let mut unmatched = Vec::new();
        for (value, file) in original {
            let expected = bump.expected(value);
            if let Some(candidate) = find(&update, |candidate| equal_ignoring_version_case(&expected, candidate)) {
                update.remove(candidate);
                continue;
            }
            if option.policy == OptionPolicy::Namespace && !bump.moved() {
                if let Some(candidate) = find(&update, |candidate| equal_ignoring_version(value, candidate)) {
                    update.remove(candidate);
                    continue;
                }
            }
            unmatched.push((value, file));
        }

        for (value, file) in unmatched {
            let version_only = find(&update, |candidate| equal_ignoring_version(value, candidate));
            let paired = version_only.or_else(|| update.keys().next().copied());
            let paired = paired.and_then(|candidate| update.remove_entry(candidate));
            match paired {
                Some((new_value, new_file))
                    if option.policy == OptionPolicy::Namespace && version_only.is_none() =>
                {
                    findings.add_finding(
                        Finding::new(
                            FindingCategory::PackagingOptionChange,
                            location(option, new_file),
                            option.name,
                            context(new_file),
                        )
                        .with_extra_info(format!("{value} -> {new_value}")),
                    );
                }
                _ => {
                    findings.add_finding(
                        Finding::new(
                            FindingCategory::PackagingOptionRemoval,
                            location(option, file),
                            option.name,
                            context(file),
                        )
                        .with_extra_info(value),
                    );
                }
            }
        }

        for (value, file) in update {
            findings.add_finding(
                Finding::new(
                    FindingCategory::PackagingOptionAddition,
                    location(option, file),
                    option.name,
                    context(file),
                )
                .with_extra_info(value),
            );
        }
    }
}

/// Distinct values of `option` across `files`, each with the first file declaring it.
fn values<'a>(option: &PackagingOption, files: &[&'a File<'a>]) -> BTreeMap<&'a str, &'a File<'a>> {
    let mut values = BTreeMap::new();
    for file in files {
        if let Some(value) = option.value(file.options()) {
            values.entry(value).or_insert(*file);
        }
    }
    values
}

fn find<'a>(values: &BTreeMap<&'a str, &'a File<'a>>, matches: impl Fn(&str) -> bool) -> Option<&'a str> {
    values.keys().copied().find(|value| matches(value))
}

fn location(option: &PackagingOption, file: &File<'_>) -> Location {
    let line = file
        .source_line(&[FILE_OPTIONS, option.field_number])
        .or_else(|| file.source_line(&[FILE_OPTIONS]));
    Location::new(file.name(), line)
}

fn context(file: &File<'_>) -> String {
    format!("Package {}", file.package())
}
