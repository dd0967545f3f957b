//! Integration tests for the directive public API.
//!
//! Every directive must converge: applying it a second time writes nothing.

use kiosk_setup::directive::{Applier, ApplyOutcome, Directive, DryRunWriter, HostWriter};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn apply_twice(directive: &Directive) -> (ApplyOutcome, ApplyOutcome) {
    let writer = HostWriter::direct();
    let applier = Applier::new(&writer);
    let first = applier.apply(directive).unwrap();
    let second = applier.apply(directive).unwrap();
    (first, second)
}

fn seed(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn line_directive_converges() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("labwc/autostart");

    let (first, second) = apply_twice(&Directive::line(&target, "wtype -M logo -k h -m logo &"));

    assert_eq!(first, ApplyOutcome::Created);
    assert_eq!(second, ApplyOutcome::Skipped);
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "wtype -M logo -k h -m logo &"
    );
}

#[test]
fn token_directive_keeps_cmdline_on_one_line() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("cmdline.txt");
    seed(&target, "console=tty1 root=PARTUUID=abcd rootwait\n");

    let (first, second) = apply_twice(&Directive::token(&target, "quiet").unwrap());

    assert_eq!(first, ApplyOutcome::Appended);
    assert_eq!(second, ApplyOutcome::Skipped);
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "console=tty1 root=PARTUUID=abcd rootwait quiet\n"
    );
}

#[test]
fn multi_word_token_is_rejected() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("cmdline.txt");
    seed(&target, "console=tty1\n");

    assert!(Directive::token(&target, "video=HDMI-A-1:1920x1080@60 quiet").is_err());
    assert_eq!(fs::read_to_string(&target).unwrap(), "console=tty1\n");
}

#[test]
fn line_with_no_extra_markers_still_converges() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("labwc/autostart");

    let directive = Directive::line(&target, "launch").with_markers(Vec::<&str>::new());
    let (first, second) = apply_twice(&directive);

    assert_eq!(first, ApplyOutcome::Created);
    assert_eq!(second, ApplyOutcome::Skipped);
    assert_eq!(fs::read_to_string(&target).unwrap(), "launch");
}

#[test]
fn replace_token_converges_on_new_value() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("cmdline.txt");
    seed(&target, "console=tty1 video=HDMI-A-1:1280x720@60 rootwait\n");

    let directive =
        Directive::replace_token(&target, "^video=HDMI-A-1:", "video=HDMI-A-1:1920x1080@60")
            .unwrap();
    let (first, second) = apply_twice(&directive);

    assert_eq!(first, ApplyOutcome::Replaced);
    assert_eq!(second, ApplyOutcome::Skipped);
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "console=tty1 video=HDMI-A-1:1920x1080@60 rootwait\n"
    );
}

#[test]
fn replace_line_appends_when_nothing_matches() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("config.txt");
    seed(&target, "dtoverlay=vc4-kms-v3d\n");

    let directive =
        Directive::replace_line(&target, r"^\s*disable_splash=", "disable_splash=1").unwrap();
    let (first, second) = apply_twice(&directive);

    assert_eq!(first, ApplyOutcome::Appended);
    assert_eq!(second, ApplyOutcome::Skipped);
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "dtoverlay=vc4-kms-v3d\ndisable_splash=1"
    );
}

#[test]
fn replacement_outside_its_pattern_is_rejected() {
    let result = Directive::replace_line("/tmp/environment", "^XKB_DEFAULT_LAYOUT=", "LAYOUT=de");
    assert!(result.is_err());
}

#[test]
fn markup_insert_lands_before_anchor_once() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("rc.xml");
    seed(
        &target,
        "<openbox_config>\n  <keyboard>\n  </keyboard>\n</openbox_config>\n",
    );

    let directive = Directive::markup_insert(
        &target,
        "</keyboard>",
        "    <keybind key=\"W-h\"><action name=\"HideCursor\"/></keybind>\n",
    );
    let (first, second) = apply_twice(&directive);

    assert_eq!(first, ApplyOutcome::Appended);
    assert_eq!(second, ApplyOutcome::Skipped);
    let contents = fs::read_to_string(&target).unwrap();
    assert_eq!(contents.matches("HideCursor").count(), 1);
    assert!(contents.find("HideCursor").unwrap() < contents.find("</keyboard>").unwrap());
}

#[test]
fn markup_insert_without_anchor_leaves_file_alone() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("rc.xml");
    seed(&target, "<openbox_config/>\n");

    let (first, _) = apply_twice(&Directive::markup_insert(&target, "</keyboard>", "<keybind/>"));

    assert!(first.is_warning());
    assert_eq!(fs::read_to_string(&target).unwrap(), "<openbox_config/>\n");
}

#[test]
fn overwrite_replaces_different_contents() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("kiosk-cec.service");
    seed(&target, "old\n");

    let (first, second) = apply_twice(&Directive::overwrite(&target, "new\n"));

    assert_eq!(first, ApplyOutcome::Replaced);
    assert_eq!(second, ApplyOutcome::Skipped);
}

#[test]
fn dry_run_stages_without_touching_disk() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("autostart");
    let writer = DryRunWriter::new(HostWriter::direct());
    let applier = Applier::new(&writer);
    let directive = Directive::line(&target, "chromium --kiosk 'https://example.com' &");

    assert_eq!(applier.apply(&directive).unwrap(), ApplyOutcome::Created);
    assert_eq!(applier.apply(&directive).unwrap(), ApplyOutcome::Skipped);

    assert!(!target.exists());
    let staged = writer.staged_writes();
    assert_eq!(staged.len(), 1);
    assert_eq!(staged[0].path, target);
}
