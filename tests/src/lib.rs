pub mod santa_stub;

#[cfg(test)]
mod tests {
    use crate::santa_stub::SantaStub;
    use monkeybars::{
        contract_file, scenarios, CheckerConfiguration, ContractChecker, Error, FailurePolicy,
        Mismatch, ScenarioStatus,
    };

    fn checker_for(stub: &SantaStub, failure_policy: FailurePolicy) -> ContractChecker {
        let mut configuration = CheckerConfiguration::new();
        configuration.set_base_url(stub.base_url());
        configuration.set_failure_policy(failure_policy);
        ContractChecker::new(configuration)
    }

    #[tokio::test]
    async fn naughty_or_nice_contract_holds() {
        let stub = SantaStub::start().await.unwrap();
        let checker = checker_for(&stub, FailurePolicy::CollectAll);

        let report = checker.run(&scenarios::naughty_or_nice()).await.unwrap();

        assert!(report.is_success(), "{}", report);
        assert_eq!(report.passed(), 4);
        stub.stop().await;
    }

    #[tokio::test]
    async fn scenarios_pass_one_by_one_in_order() {
        let stub = SantaStub::start().await.unwrap();
        let checker = checker_for(&stub, FailurePolicy::CollectAll);

        for expectation in scenarios::naughty_or_nice() {
            let outcome = checker.check(&expectation).await.unwrap();
            assert!(outcome.is_passed(), "{}", outcome);
        }

        // both classifications have been reported, so the service has nothing left
        let outcome = checker.check(&scenarios::check_nice()).await.unwrap();
        assert!(outcome.mismatches().contains(&Mismatch::Status {
            expected: 200,
            actual: 404
        }));
        stub.stop().await;
    }

    #[tokio::test]
    async fn status_checks_without_prior_submissions_fail() {
        let stub = SantaStub::start().await.unwrap();
        let checker = checker_for(&stub, FailurePolicy::CollectAll);
        let reordered = [
            scenarios::check_naughty(),
            scenarios::check_nice(),
            scenarios::submit_naughty(),
            scenarios::submit_nice(),
        ];

        let report = checker.run(&reordered).await.unwrap();

        assert!(!report.is_success());
        let failed: Vec<usize> = report.failures().map(|outcome| outcome.index).collect();
        assert_eq!(failed, vec![1, 2]);
        assert!(report.outcomes()[0].mismatches().contains(&Mismatch::Status {
            expected: 200,
            actual: 404
        }));
        assert!(matches!(
            report.into_result(),
            Err(Error::ContractViolated(_))
        ));
        stub.stop().await;
    }

    #[tokio::test]
    async fn fail_fast_stops_at_the_first_failure() {
        let stub = SantaStub::start().await.unwrap();
        let checker = checker_for(&stub, FailurePolicy::FailFast);
        let reordered = [
            scenarios::check_naughty(),
            scenarios::submit_naughty(),
            scenarios::submit_nice(),
        ];

        let report = checker.run(&reordered).await.unwrap();

        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.outcomes()[2].status, ScenarioStatus::Skipped);
        stub.stop().await;
    }

    #[tokio::test]
    async fn wrong_content_type_is_reported() {
        let stub = SantaStub::start_with_content_type("text/plain").await.unwrap();
        let checker = checker_for(&stub, FailurePolicy::CollectAll);

        let report = checker.run(&scenarios::naughty_or_nice()).await.unwrap();

        // the nice submission only checks its status
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 3);
        assert_eq!(
            report.outcomes()[0].mismatches(),
            &[Mismatch::HeaderValue {
                name: "content-type".into(),
                pattern: "json".into(),
                actual: "text/plain".into(),
            }]
        );
        stub.stop().await;
    }

    #[tokio::test]
    async fn exported_contract_checks_the_same_service() {
        let stub = SantaStub::start().await.unwrap();
        let checker = checker_for(&stub, FailurePolicy::CollectAll);
        let contract_path = std::env::temp_dir().join(format!(
            "monkeybars-contract-{}.md",
            std::process::id()
        ));

        contract_file::save_contract(&contract_path, &scenarios::naughty_or_nice()).unwrap();
        let loaded = contract_file::load_contract(&contract_path).unwrap();
        let _ = std::fs::remove_file(&contract_path);

        let report = checker.run(&loaded).await.unwrap();

        assert!(report.is_success(), "{}", report);
        assert_eq!(report.outcomes()[2].name, "query status, expect naughty");
        stub.stop().await;
    }
}
