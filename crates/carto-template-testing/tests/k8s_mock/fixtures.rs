use carto_template_testing::yaml::must_unstructured;
use serde_json::Value;

pub(crate) fn git_repository_template() -> Value {
    must_unstructured(
        r#"
        apiVersion: carto.run/v1alpha1
        kind: ClusterSourceTemplate
        metadata:
          name: git-repository
        spec:
          urlPath: .status.artifact.url
          revisionPath: .status.artifact.revision
          params:
            - name: git_implementation
              default: go-git
            - name: git_secret
          template:
            apiVersion: source.toolkit.fluxcd.io/v1beta1
            kind: GitRepository
            metadata:
              name: $(workload.metadata.name)$
              labels:
                app.kubernetes.io/component: source
            spec:
              interval: 1m0s
              url: $(workload.spec.source.git.url)$
              ref: $(workload.spec.source.git.ref)$
              gitImplementation: $(params.git_implementation)$
              ignore: '!.git'
              secretRef:
                name: $(params.git_secret)$
        "#,
    )
}

pub(crate) fn image_template() -> Value {
    must_unstructured(
        r#"
        apiVersion: carto.run/v1alpha1
        kind: ClusterImageTemplate
        metadata:
          name: image
        spec:
          imagePath: .status.latestImage
          params:
            - name: registry
              default: {server: "foo", repository: "bar"}
          template:
            apiVersion: kpack.io/v1alpha2
            kind: Image
            metadata:
              name: $(workload.metadata.name)$
              labels:
                app.kubernetes.io/component: build
            spec:
              tag: $(params.registry.server)$/$(params.registry.repository)$/$(workload.metadata.name)$
              source:
                blob:
                  url: $(source.url)$
        "#,
    )
}
