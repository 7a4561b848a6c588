//! Integration tests for gistup

mod server;

use gistup::config::CACHE_DIR_ENV;
use gistup::{
    CacheStore, Config, GistupError, Importer, HttpTransport, LoadOptions, Transport,
};
use serial_test::serial;
use server::TestServer;
use tempfile::TempDir;

const GREET: &str = r#"
    (module
      (import "gistup" "log" (func $log (param i32 i32)))
      (memory (export "memory") 1)
      (data (i32.const 0) "greetings")
      (func $init (call $log (i32.const 0) (i32.const 9)))
      (start $init)
      (func (export "answer") (result i32) (i32.const 42)))
"#;

fn importer(temp: &TempDir) -> Importer {
    let config = Config::default();
    let cache = CacheStore::new(
        temp.path().join("cache"),
        Box::new(HttpTransport::new(&config.http)),
    );
    Importer::with_cache(config, cache).unwrap()
}

mod transport_tests {
    use super::*;

    #[test]
    fn fetches_body_on_200() {
        let server = TestServer::start();
        server.serve("/ok.wat", 200, b"(module)");

        let body = HttpTransport::default().fetch(&server.url("/ok.wat")).unwrap();
        assert_eq!(body, b"(module)");
    }

    #[test]
    fn non_200_is_a_download_error() {
        let server = TestServer::start();
        server.serve("/moved.wat", 204, b"");
        let url = server.url("/missing.wat");

        let err = HttpTransport::default().fetch(&url).unwrap_err();
        assert!(matches!(err, GistupError::Download { status: 404, url: ref u } if *u == url));

        let err = HttpTransport::default()
            .fetch(&server.url("/moved.wat"))
            .unwrap_err();
        assert!(matches!(err, GistupError::Download { status: 204, .. }));
    }

    #[test]
    fn unreachable_host_is_an_http_error() {
        let err = HttpTransport::default()
            .fetch("http://127.0.0.1:1/none.wat")
            .unwrap_err();
        assert!(matches!(err, GistupError::Http { .. }));
    }
}

mod importer_tests {
    use super::*;

    #[test]
    fn download_once_then_load_from_cache() {
        let server = TestServer::start();
        server.serve("/gist/greet.wat", 200, GREET.as_bytes());
        let temp = TempDir::new().unwrap();
        let mut importer = importer(&temp);
        let url = server.url("/gist/greet.wat");

        let first = importer.load_from_url(&url, &LoadOptions::default()).unwrap();
        let second = importer.load_from_url(&url, &LoadOptions::default()).unwrap();

        assert_eq!(server.hits("/gist/greet.wat"), 1);
        assert_eq!(first.path(), second.path());
        assert_eq!(importer.registry().output(), ["greetings", "greetings"]);
        let answer: i32 = importer.registry_mut().call("greet", "answer", ()).unwrap();
        assert_eq!(answer, 42);
    }

    #[test]
    fn forced_refresh_downloads_again() {
        let server = TestServer::start();
        server.serve("/gist/greet.wat", 200, GREET.as_bytes());
        let temp = TempDir::new().unwrap();
        let mut importer = importer(&temp);
        let url = server.url("/gist/greet.wat");

        importer.load_from_url(&url, &LoadOptions::default()).unwrap();
        importer
            .load_from_url(&url, &LoadOptions::default().force_download(true))
            .unwrap();

        assert_eq!(server.hits("/gist/greet.wat"), 2);
        assert_eq!(importer.cache().orphans().unwrap().len(), 1);
    }

    #[test]
    fn failed_download_leaves_database_untouched() {
        let server = TestServer::start();
        let temp = TempDir::new().unwrap();
        let mut importer = importer(&temp);
        let url = server.url("/gist/absent.wat");

        let err = importer.load_from_url(&url, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, GistupError::Download { status: 404, .. }));
        assert!(importer.cache().lookup(&url).unwrap().is_none());
        assert!(!importer.cache().database_path().exists());
    }

    #[test]
    fn clean_cache_then_reload_downloads() {
        let server = TestServer::start();
        server.serve("/gist/greet.wat", 200, GREET.as_bytes());
        let temp = TempDir::new().unwrap();
        let mut importer = importer(&temp);
        let url = server.url("/gist/greet.wat");

        importer.load_from_url(&url, &LoadOptions::default()).unwrap();
        importer.clean_cache().unwrap();
        assert!(!importer.cache().root().exists());

        importer.load_from_url(&url, &LoadOptions::default()).unwrap();
        assert_eq!(server.hits("/gist/greet.wat"), 2);
    }

    #[test]
    fn module_error_surfaces_after_successful_download() {
        let server = TestServer::start();
        server.serve(
            "/gist/boom.wat",
            200,
            b"(module (func $boom unreachable) (start $boom))",
        );
        let temp = TempDir::new().unwrap();
        let mut importer = importer(&temp);
        let url = server.url("/gist/boom.wat");

        let err = importer.load_from_url(&url, &LoadOptions::default()).unwrap_err();
        assert!(err.trap().is_some());
        // The bytes are cached even though the module failed to run
        assert!(importer.cache().lookup(&url).unwrap().is_some());
    }

    #[test]
    #[serial]
    fn cache_dir_env_var_is_honored() {
        let server = TestServer::start();
        server.serve("/gist/greet.wat", 200, GREET.as_bytes());
        let temp = TempDir::new().unwrap();
        std::env::set_var(CACHE_DIR_ENV, temp.path().join("env-cache"));

        let mut importer = Importer::new(Config::default()).unwrap();
        let module = importer
            .load_from_url(&server.url("/gist/greet.wat"), &LoadOptions::default())
            .unwrap();
        std::env::remove_var(CACHE_DIR_ENV);

        assert!(module.path().starts_with(temp.path().join("env-cache")));
        assert!(temp.path().join("env-cache").join("files.json").exists());
    }
}
