//! Unit tests for CLI argument parsing
#[cfg(test)]
mod tests {
	use mmid::ImageLimit;
	use mmid::cli::args::{Command, parse_args};
	use mmid::services::catalog::PackageKind;

	fn make_args(raw: &[&str]) -> Vec<String> {
		raw.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn parse_extract_with_all_options() {
		let argv = make_args(&[
			"mmid",
			"extract",
			"scale-german-package.tgz",
			"--dest",
			"german-k3",
			"--limit",
			"3",
			"--progress-interval",
			"5",
			"--json",
		]);

		let parsed = parse_args(&argv).expect("parse extract args");
		let Command::Extract(extract) = parsed.command else {
			panic!("expected extract command");
		};

		assert_eq!(extract.source, "scale-german-package.tgz");
		assert_eq!(extract.dest.as_deref(), Some("german-k3"));
		assert_eq!(extract.limit, Some(ImageLimit::Limited(3)));
		assert_eq!(extract.progress_interval_secs, Some(5));
		assert!(extract.json);
		assert!(!extract.quiet);
	}

	#[test]
	fn extract_destination_defaults_next_to_source() {
		let argv = make_args(&["mmid", "extract", "data/german/"]);

		let parsed = parse_args(&argv).expect("parse extract args");
		let Command::Extract(extract) = parsed.command else {
			panic!("expected extract command");
		};

		assert!(extract.limit.is_none());
		assert_eq!(extract.dest_or_default(), "data/german_extracted");
	}

	#[test]
	fn extract_rejects_zero_limit_and_interval() {
		let zero_limit = make_args(&["mmid", "extract", "pkg.tgz", "--limit", "0"]);
		assert!(parse_args(&zero_limit).is_err());

		let zero_interval = make_args(&["mmid", "extract", "pkg.tgz", "--progress-interval", "0"]);
		assert!(parse_args(&zero_interval).is_err());

		let dangling = make_args(&["mmid", "extract", "pkg.tgz", "--limit"]);
		assert!(parse_args(&dangling).is_err());
	}

	#[test]
	fn extract_accepts_all_as_limit() {
		let argv = make_args(&["mmid", "extract", "pkg.tgz", "--limit", "all"]);

		let parsed = parse_args(&argv).expect("parse extract args");
		let Command::Extract(extract) = parsed.command else {
			panic!("expected extract command");
		};

		assert_eq!(extract.limit, Some(ImageLimit::Unlimited));
	}

	#[test]
	fn parse_fetch_lowercases_language() {
		let argv = make_args(&[
			"mmid",
			"fetch",
			"German",
			"--catalog",
			"downloads.md",
			"--type",
			"mini",
			"--extract",
			"--keep-full",
		]);

		let parsed = parse_args(&argv).expect("parse fetch args");
		let Command::Fetch(fetch) = parsed.command else {
			panic!("expected fetch command");
		};

		assert_eq!(fetch.language, "german");
		assert_eq!(fetch.kind, Some(PackageKind::Mini));
		assert_eq!(fetch.dest, ".");
		assert!(fetch.extract);
		assert!(fetch.keep_full);
	}

	#[test]
	fn fetch_requires_catalog() {
		let argv = make_args(&["mmid", "fetch", "german"]);
		let err = parse_args(&argv).unwrap_err();
		assert!(err.contains("--catalog"));
	}

	#[test]
	fn parse_manifest_collects_packages() {
		let argv = make_args(&["mmid", "manifest", "a-k3", "b-k3", "--output", "m.js"]);

		let parsed = parse_args(&argv).expect("parse manifest args");
		let Command::Manifest(manifest) = parsed.command else {
			panic!("expected manifest command");
		};

		assert_eq!(manifest.packages, vec!["a-k3", "b-k3"]);
		assert_eq!(manifest.output, "m.js");
		assert_eq!(manifest.assets, "assets");
	}

	#[test]
	fn parse_manifest_takes_assets_root() {
		let argv = make_args(&["mmid", "manifest", "a-k3", "--assets", "web/assets"]);

		let parsed = parse_args(&argv).expect("parse manifest args");
		let Command::Manifest(manifest) = parsed.command else {
			panic!("expected manifest command");
		};

		assert_eq!(manifest.assets, "web/assets");
		assert_eq!(manifest.output, "package_manifest.js");
	}

	#[test]
	fn parse_sample_uses_defaults() {
		let argv = make_args(&["mmid", "sample", "scale-german-k3"]);

		let parsed = parse_args(&argv).expect("parse sample args");
		let Command::Sample(sample) = parsed.command else {
			panic!("expected sample command");
		};

		assert_eq!(sample.count, 600);
		assert_eq!(sample.seed, 42);
		assert_eq!(sample.prefix, "mini-");
	}

	#[test]
	fn unknown_command_and_option_are_errors() {
		assert!(parse_args(&make_args(&["mmid", "crop"])).is_err());
		assert!(parse_args(&make_args(&["mmid", "index", "d", "--bogus"])).is_err());
		assert!(parse_args(&make_args(&["mmid"])).is_err());
	}
}
