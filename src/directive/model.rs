//! Directive types and their presence/edit strategies.

use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;

use super::text;
use crate::error::{KioskError, Result};

/// How a target file is divided into units for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Whitespace-separated tokens (boot command line).
    Tokens,
    /// Lines (key=value files, shell scripts).
    Lines,
}

/// Which write capability a directive needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteScope {
    /// Inside the invoking user's writable area.
    User,
    /// System-wide path; written through the privilege-escalation prefix.
    System,
}

/// Result of evaluating a directive's presence predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    Absent,
    Differs,
}

/// What applying a directive did to its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The target was missing or empty and now holds the payload.
    Created,
    /// The payload was added to existing content.
    Appended,
    /// Matching content was substituted in place.
    Replaced,
    /// The directive was already present; nothing was written.
    Skipped,
    /// The insertion anchor was not found; nothing was written.
    AnchorMissing { anchor: String },
}

impl ApplyOutcome {
    /// Whether the target file was written.
    pub fn wrote(&self) -> bool {
        matches!(self, Self::Created | Self::Appended | Self::Replaced)
    }

    /// Whether the outcome must be surfaced as a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::AnchorMissing { .. })
    }
}

impl fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Appended => write!(f, "appended"),
            Self::Replaced => write!(f, "replaced"),
            Self::Skipped => write!(f, "skipped"),
            Self::AnchorMissing { anchor } => write!(f, "skipped (anchor '{}' missing)", anchor),
        }
    }
}

/// Format-specific strategy of a directive.
#[derive(Debug, Clone)]
pub enum DirectiveKind {
    /// Ensure a token, line or atomic block is present.
    ///
    /// Presence is any of `markers` appearing: as a whole token for
    /// [`Layout::Tokens`], as a substring for [`Layout::Lines`].
    LineToken {
        layout: Layout,
        payload: String,
        markers: Vec<String>,
    },
    /// Ensure every unit matching `pattern` equals `replacement`, appending
    /// the replacement when nothing matches.
    RegexReplace {
        layout: Layout,
        pattern: Regex,
        replacement: String,
    },
    /// Insert `fragment` before `anchor` unless a marker is already present.
    ///
    /// A missing or empty target is seeded with `template` when one is given.
    MarkupInsert {
        anchor: String,
        fragment: String,
        markers: Vec<String>,
        template: Option<String>,
    },
    /// Own the whole file.
    Overwrite { contents: String },
}

/// A single idempotent mutation of one target file.
#[derive(Debug, Clone)]
pub struct Directive {
    pub target: PathBuf,
    pub scope: WriteScope,
    pub kind: DirectiveKind,
}

/// The decision taken for a directive against some current contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub outcome: ApplyOutcome,
    /// New file contents; `None` when nothing is written.
    pub contents: Option<String>,
}

impl Plan {
    fn unchanged(outcome: ApplyOutcome) -> Self {
        Self {
            outcome,
            contents: None,
        }
    }

    fn write(outcome: ApplyOutcome, contents: String) -> Self {
        Self {
            outcome,
            contents: Some(contents),
        }
    }
}

impl Directive {
    fn new(target: impl Into<PathBuf>, kind: DirectiveKind) -> Self {
        Self {
            target: target.into(),
            scope: WriteScope::User,
            kind,
        }
    }

    /// Ensure `line` (or a multi-line block) is present.
    pub fn line(target: impl Into<PathBuf>, line: impl Into<String>) -> Self {
        let payload = line.into();
        Self::new(
            target,
            DirectiveKind::LineToken {
                layout: Layout::Lines,
                markers: vec![payload.clone()],
                payload,
            },
        )
    }

    /// Ensure a whitespace-separated `token` is present.
    ///
    /// The token must be a single non-empty word; anything else could never
    /// be found again as a whole token.
    pub fn token(target: impl Into<PathBuf>, token: impl Into<String>) -> Result<Self> {
        let target = target.into();
        let payload = token.into();
        if payload.is_empty() || payload.contains(char::is_whitespace) {
            return Err(KioskError::InvalidDirective {
                path: target,
                message: format!("token '{}' must be a single word", payload),
            });
        }
        Ok(Self::new(
            target,
            DirectiveKind::LineToken {
                layout: Layout::Tokens,
                markers: vec![payload.clone()],
                payload,
            },
        ))
    }

    /// Replace lines matching `pattern` with `replacement`, or append it.
    pub fn replace_line(
        target: impl Into<PathBuf>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self> {
        Self::replace(target.into(), Layout::Lines, pattern, replacement.into())
    }

    /// Replace tokens matching `pattern` with `replacement`, or append it.
    pub fn replace_token(
        target: impl Into<PathBuf>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self> {
        Self::replace(target.into(), Layout::Tokens, pattern, replacement.into())
    }

    fn replace(target: PathBuf, layout: Layout, pattern: &str, replacement: String) -> Result<Self> {
        let invalid = |message: String| KioskError::InvalidDirective {
            path: target.clone(),
            message,
        };

        let pattern = Regex::new(pattern).map_err(|e| invalid(e.to_string()))?;
        if !pattern.is_match(&replacement) {
            return Err(invalid(format!(
                "replacement '{}' does not match its own pattern '{}'",
                replacement,
                pattern.as_str()
            )));
        }
        let single_unit = match layout {
            Layout::Tokens => !replacement.is_empty() && !replacement.contains(char::is_whitespace),
            Layout::Lines => !replacement.contains('\n'),
        };
        if !single_unit {
            return Err(invalid(format!(
                "replacement '{}' must be a single {}",
                replacement,
                if layout == Layout::Tokens { "token" } else { "line" }
            )));
        }

        Ok(Self::new(
            target,
            DirectiveKind::RegexReplace {
                layout,
                pattern,
                replacement,
            },
        ))
    }

    /// Insert `fragment` before the first `anchor` in a markup file.
    pub fn markup_insert(
        target: impl Into<PathBuf>,
        anchor: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        let fragment = fragment.into();
        Self::new(
            target,
            DirectiveKind::MarkupInsert {
                anchor: anchor.into(),
                markers: vec![fragment.trim().to_string()],
                fragment,
                template: None,
            },
        )
    }

    /// Write `contents` as the whole file.
    pub fn overwrite(target: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self::new(
            target,
            DirectiveKind::Overwrite {
                contents: contents.into(),
            },
        )
    }

    /// Also accept any of `markers` as evidence that the directive is present.
    ///
    /// The payload itself always stays a marker. Applies to line, token and
    /// markup directives; other kinds ignore it.
    pub fn with_markers<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (markers, own) = match &mut self.kind {
            DirectiveKind::LineToken {
                markers, payload, ..
            } => (markers, payload.clone()),
            DirectiveKind::MarkupInsert {
                markers, fragment, ..
            } => (markers, fragment.trim().to_string()),
            DirectiveKind::RegexReplace { .. } | DirectiveKind::Overwrite { .. } => return self,
        };
        markers.clear();
        markers.push(own);
        for marker in extra.into_iter().map(Into::into) {
            if !marker.is_empty() && !markers.contains(&marker) {
                markers.push(marker);
            }
        }
        self
    }

    /// Seed a missing or empty markup target with `template`.
    pub fn with_template(mut self, contents: impl Into<String>) -> Self {
        if let DirectiveKind::MarkupInsert { template, .. } = &mut self.kind {
            *template = Some(contents.into());
        }
        self
    }

    /// Set the write scope the applier requests from its writer.
    pub fn with_scope(mut self, scope: WriteScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Evaluate the presence predicate against `contents`.
    pub fn presence(&self, contents: &str) -> Presence {
        match &self.kind {
            DirectiveKind::LineToken {
                layout, markers, ..
            } => {
                let found = match layout {
                    Layout::Tokens => text::units(contents, Layout::Tokens)
                        .iter()
                        .any(|t| markers.iter().any(|m| m == t)),
                    Layout::Lines => markers.iter().any(|m| contents.contains(m.as_str())),
                };
                if found {
                    Presence::Present
                } else {
                    Presence::Absent
                }
            }
            DirectiveKind::RegexReplace {
                layout,
                pattern,
                replacement,
            } => {
                let units = text::units(contents, *layout);
                let mut matched = units.iter().filter(|u| pattern.is_match(u)).peekable();
                if matched.peek().is_none() {
                    Presence::Absent
                } else if matched.all(|u| *u == replacement) {
                    Presence::Present
                } else {
                    Presence::Differs
                }
            }
            DirectiveKind::MarkupInsert { markers, .. } => {
                if markers.iter().any(|m| contents.contains(m.as_str())) {
                    Presence::Present
                } else {
                    Presence::Absent
                }
            }
            DirectiveKind::Overwrite { contents: wanted } => {
                if contents == wanted {
                    Presence::Present
                } else if contents.is_empty() {
                    Presence::Absent
                } else {
                    Presence::Differs
                }
            }
        }
    }

    /// Decide what to do given the current contents (`None` if missing).
    ///
    /// Pure: the caller performs the write.
    pub fn plan(&self, current: Option<&str>) -> Plan {
        let blank = current.map_or(true, str::is_empty);

        // Full-content templates seed a missing or empty target verbatim.
        if let DirectiveKind::MarkupInsert {
            template: Some(template),
            ..
        } = &self.kind
        {
            if blank && !template.is_empty() {
                let seeded = self.plan(Some(template));
                let contents = seeded.contents.unwrap_or_else(|| template.clone());
                return match seeded.outcome {
                    ApplyOutcome::AnchorMissing { .. } => Plan::unchanged(seeded.outcome),
                    _ => Plan::write(ApplyOutcome::Created, contents),
                };
            }
        }

        let contents = current.unwrap_or("");
        let written = |edited: String, outcome: ApplyOutcome| {
            if blank {
                Plan::write(ApplyOutcome::Created, edited)
            } else {
                Plan::write(outcome, edited)
            }
        };

        match (self.presence(contents), &self.kind) {
            (Presence::Present, _) => Plan::unchanged(ApplyOutcome::Skipped),

            (Presence::Absent, DirectiveKind::LineToken { layout, payload, .. }) => {
                written(text::append_unit(contents, payload, *layout), ApplyOutcome::Appended)
            }
            (Presence::Absent, DirectiveKind::RegexReplace {
                layout,
                replacement,
                ..
            }) => written(
                text::append_unit(contents, replacement, *layout),
                ApplyOutcome::Appended,
            ),
            (Presence::Differs, DirectiveKind::RegexReplace {
                layout,
                pattern,
                replacement,
            }) => {
                let (edited, _) = text::replace_matching(contents, pattern, replacement, *layout);
                Plan::write(ApplyOutcome::Replaced, edited)
            }
            (_, DirectiveKind::MarkupInsert {
                anchor, fragment, ..
            }) => match text::insert_before_anchor(contents, anchor, fragment) {
                Some(edited) => Plan::write(ApplyOutcome::Appended, edited),
                None => Plan::unchanged(ApplyOutcome::AnchorMissing {
                    anchor: anchor.clone(),
                }),
            },
            (_, DirectiveKind::Overwrite { contents: wanted }) => {
                written(wanted.clone(), ApplyOutcome::Replaced)
            }
            // Line and token directives never report a differing presence.
            (Presence::Differs, DirectiveKind::LineToken { .. }) => {
                Plan::unchanged(ApplyOutcome::Skipped)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_twice(directive: &Directive, start: Option<&str>) -> (Plan, Plan) {
        let first = directive.plan(start);
        let after = first
            .contents
            .clone()
            .or_else(|| start.map(str::to_string));
        let second = directive.plan(after.as_deref());
        (first, second)
    }

    #[test]
    fn line_into_empty_file_is_created_verbatim() {
        let d = Directive::line("/tmp/autostart", "launch-cmd --kiosk URL");
        let plan = d.plan(Some(""));
        assert_eq!(plan.outcome, ApplyOutcome::Created);
        assert_eq!(plan.contents.as_deref(), Some("launch-cmd --kiosk URL"));
    }

    #[test]
    fn line_already_present_is_skipped() {
        let d = Directive::line("/tmp/autostart", "launch-cmd --kiosk URL");
        let plan = d.plan(Some("launch-cmd --kiosk URL"));
        assert_eq!(plan, Plan::unchanged(ApplyOutcome::Skipped));
    }

    #[test]
    fn equivalent_spelling_counts_as_present() {
        let d = Directive::line("/tmp/autostart", "chromium --kiosk https://a")
            .with_markers(["chromium --kiosk", "chromium-browser --kiosk"]);
        assert_eq!(
            d.presence("chromium-browser --kiosk https://old &\n"),
            Presence::Present
        );
    }

    #[test]
    fn line_appended_after_existing_content() {
        let d = Directive::line("/tmp/autostart", "wtype -M logo -k h");
        let plan = d.plan(Some("swaybg &"));
        assert_eq!(plan.outcome, ApplyOutcome::Appended);
        assert_eq!(plan.contents.as_deref(), Some("swaybg &\nwtype -M logo -k h"));
    }

    #[test]
    fn token_presence_is_whole_token() {
        let d = Directive::token("/boot/cmdline.txt", "splash").unwrap();
        assert_eq!(d.presence("console=tty1 nosplash"), Presence::Absent);
        assert_eq!(d.presence("console=tty1 splash"), Presence::Present);
    }

    #[test]
    fn token_appended_to_first_line() {
        let d = Directive::token("/boot/cmdline.txt", "quiet").unwrap();
        let (first, second) = apply_twice(&d, Some("console=tty1 rootwait\n"));
        assert_eq!(first.outcome, ApplyOutcome::Appended);
        assert_eq!(first.contents.as_deref(), Some("console=tty1 rootwait quiet\n"));
        assert_eq!(second.outcome, ApplyOutcome::Skipped);
    }

    #[test]
    fn replace_line_differs_then_converges() {
        let d = Directive::replace_line("/tmp/environment", "^XKB_DEFAULT_LAYOUT=", "XKB_DEFAULT_LAYOUT=de")
            .unwrap();
        let (first, second) = apply_twice(&d, Some("XKB_DEFAULT_LAYOUT=us\n"));
        assert_eq!(first.outcome, ApplyOutcome::Replaced);
        assert_eq!(first.contents.as_deref(), Some("XKB_DEFAULT_LAYOUT=de\n"));
        assert_eq!(second.outcome, ApplyOutcome::Skipped);
    }

    #[test]
    fn replace_line_appends_when_absent() {
        let d = Directive::replace_line("/boot/config.txt", "^disable_splash=", "disable_splash=1").unwrap();
        let plan = d.plan(Some("dtparam=audio=on\n"));
        assert_eq!(plan.outcome, ApplyOutcome::Appended);
        assert_eq!(plan.contents.as_deref(), Some("dtparam=audio=on\ndisable_splash=1"));
    }

    #[test]
    fn replace_with_nonmatching_replacement_is_rejected() {
        let err = Directive::replace_line("/tmp/x", "^a=", "b=1").unwrap_err();
        assert!(matches!(err, KioskError::InvalidDirective { .. }));
    }

    #[test]
    fn replace_token_rejects_whitespace() {
        assert!(Directive::replace_token("/tmp/x", "^video=", "video=a b").is_err());
    }

    #[test]
    fn markup_insert_before_anchor() {
        let d = Directive::markup_insert("/tmp/rc.xml", "</keyboard>", "  <keybind key=\"W-h\"/>");
        let (first, second) = apply_twice(&d, Some("<keyboard>\n</keyboard>\n"));
        assert_eq!(first.outcome, ApplyOutcome::Appended);
        assert_eq!(
            first.contents.as_deref(),
            Some("<keyboard>\n  <keybind key=\"W-h\"/>\n</keyboard>\n")
        );
        assert_eq!(second.outcome, ApplyOutcome::Skipped);
    }

    #[test]
    fn markup_insert_without_anchor_leaves_file_alone() {
        let d = Directive::markup_insert("/tmp/rc.xml", "</keyboard>", "<keybind/>");
        let plan = d.plan(Some("<keyboard >\n</ keyboard>\n"));
        assert_eq!(
            plan,
            Plan::unchanged(ApplyOutcome::AnchorMissing {
                anchor: "</keyboard>".to_string()
            })
        );
    }

    #[test]
    fn markup_template_seeds_missing_file() {
        let template = "<openbox_config>\n<keyboard>\n  <keybind key=\"W-h\"/>\n</keyboard>\n</openbox_config>\n";
        let d = Directive::markup_insert("/tmp/rc.xml", "</keyboard>", "  <keybind key=\"W-h\"/>")
            .with_template(template);
        let plan = d.plan(None);
        assert_eq!(plan.outcome, ApplyOutcome::Created);
        assert_eq!(plan.contents.as_deref(), Some(template));
    }

    #[test]
    fn markup_template_without_fragment_gets_it_inserted() {
        let d = Directive::markup_insert("/tmp/rc.xml", "</keyboard>", "<x/>")
            .with_template("<keyboard>\n</keyboard>\n");
        let plan = d.plan(Some(""));
        assert_eq!(plan.outcome, ApplyOutcome::Created);
        assert_eq!(plan.contents.as_deref(), Some("<keyboard>\n<x/>\n</keyboard>\n"));
    }

    #[test]
    fn markup_without_template_on_missing_file_reports_anchor() {
        let d = Directive::markup_insert("/tmp/rc.xml", "</keyboard>", "<x/>");
        let plan = d.plan(None);
        assert!(plan.outcome.is_warning());
        assert!(plan.contents.is_none());
    }

    #[test]
    fn overwrite_outcomes() {
        let d = Directive::overwrite("/etc/greetd/config.toml", "[terminal]\nvt = 7\n");
        assert_eq!(d.plan(None).outcome, ApplyOutcome::Created);
        assert_eq!(d.plan(Some("old")).outcome, ApplyOutcome::Replaced);
        assert_eq!(d.plan(Some("[terminal]\nvt = 7\n")).outcome, ApplyOutcome::Skipped);
    }

    #[test]
    fn system_scope_is_requested_not_inferred() {
        let d = Directive::overwrite("/etc/greetd/config.toml", "x");
        assert_eq!(d.scope, WriteScope::User);
        assert_eq!(d.with_scope(WriteScope::System).scope, WriteScope::System);
    }

    #[test]
    fn token_must_be_a_single_word() {
        for bad in ["", "video=HDMI-A-1:1920x1080@60 quiet", "quiet\n"] {
            let err = Directive::token("/boot/cmdline.txt", bad).unwrap_err();
            assert!(matches!(err, KioskError::InvalidDirective { .. }), "{bad:?}");
        }
    }

    #[test]
    fn empty_marker_list_keeps_the_payload() {
        let d = Directive::line("/tmp/autostart", "launch").with_markers(Vec::<String>::new());
        assert_eq!(d.presence("launch\n"), Presence::Present);

        let plan = d.plan(Some("launch"));
        assert_eq!(plan.outcome, ApplyOutcome::Skipped);
    }

    #[test]
    fn extra_markers_add_to_the_payload() {
        let d = Directive::line("/tmp/autostart", "chromium --kiosk https://a")
            .with_markers(["chromium-browser --kiosk"]);
        assert_eq!(d.presence("chromium --kiosk https://a\n"), Presence::Present);
        assert_eq!(d.presence("chromium-browser --kiosk https://b\n"), Presence::Present);
        assert_eq!(d.presence("firefox\n"), Presence::Absent);
    }

    #[test]
    fn outcome_display() {
        assert_eq!(ApplyOutcome::Created.to_string(), "created");
        assert_eq!(
            ApplyOutcome::AnchorMissing {
                anchor: "</keyboard>".into()
            }
            .to_string(),
            "skipped (anchor '</keyboard>' missing)"
        );
    }
}
