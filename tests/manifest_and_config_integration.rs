use bmt_deploy::config::Config;
use bmt_deploy::manifest::{DEFAULT_REMOTE_DIR, parse_hosts, parse_manifest};

#[test]
fn ipv6_host_round_trips_without_brackets() {
    let hosts = parse_hosts("fde0::1\n#comment\n\n10.0.0.1\n");
    assert_eq!(hosts.len(), 2);
    assert_eq!(hosts[0].0, "fde0::1");
}

#[test]
fn manifest_defaults_missing_dir_and_skips_bad_lines() {
    let text = "svc=/opt/app\nhello.bin\n=/tmp/\n# a comment\n\nbad\n";
    let (entries, warnings) = parse_manifest(text);
    assert_eq!(warnings.len(), 1);
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].remote_dir, "/opt/app/");
    assert_eq!(entries[1].remote_dir, DEFAULT_REMOTE_DIR);
    assert_eq!(entries[2].filename, "bad");
    assert_eq!(entries[2].remote_dir, DEFAULT_REMOTE_DIR);
}

#[test]
fn config_round_trips_through_disk() {
    let dir = std::env::temp_dir().join(format!("bmt_cfg_integration_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let first = Config::load_or_init(&dir).unwrap();
    assert_eq!(first.retry.round_interval, 30);

    // A second load should read back the materialized file rather than re-writing defaults.
    std::fs::write(
        dir.join("config.json"),
        r#"{"ssh":{"port":2222,"user":"svc","password":"x"},"ping":{"interval":5,"timeout":2},"retry":{"round_interval":30,"ssh_attempts_per_round":4,"ssh_attempt_interval":5},"notification":{"enabled":false,"notify_on":["start","complete"],"email":null}}"#,
    )
    .unwrap();
    let second = Config::load_or_init(&dir).unwrap();
    assert_eq!(second.ssh.port, 2222);
    assert_eq!(second.ssh.user, "svc");

    let _ = std::fs::remove_dir_all(&dir);
}
