use super::*;

#[test]
fn lookup_url_embeds_barcode_with_trailing_pipe() {
    let url = lookup_url(LOOKUP_BASE, "7898080641699").unwrap();
    assert_eq!(
        url,
        "https://portal.nfce.sefaz.rn.gov.br/consultarNFCe.aspx?p=7898080641699|"
    );
}

#[test]
fn lookup_url_accepts_alternate_base() {
    let url = lookup_url("http://127.0.0.1:9999/consulta", "123").unwrap();
    assert_eq!(url, "http://127.0.0.1:9999/consulta?p=123|");
}

#[test]
fn lookup_url_passes_barcode_verbatim() {
    // No validation and no escaping beyond non-emptiness: the portal
    // decides what a valid lookup key is.
    let url = lookup_url(LOOKUP_BASE, "abc").unwrap();
    assert!(url.ends_with("?p=abc|"));
}

#[test]
fn lookup_url_rejects_empty_barcode() {
    let result = lookup_url(LOOKUP_BASE, "");
    assert!(
        matches!(result, Err(FetchError::EmptyBarcode)),
        "expected EmptyBarcode, got: {result:?}"
    );
}
