// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Hash related utils.

use crate::Error;
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use md5::Digest;
use md5::Md5;

/// Base64 encode
pub fn base64_encode(content: &[u8]) -> String {
    BASE64_STANDARD.encode(content)
}

/// Base64 decode
pub fn base64_decode(content: &str) -> crate::Result<Vec<u8>> {
    BASE64_STANDARD
        .decode(content)
        .map_err(|e| Error::unexpected("base64 decode failed").with_source(e))
}

/// Hex encoded MD5 content digest.
///
/// Empty input yields the empty string rather than the MD5 of zero bytes.
/// The plaintext builder relies on this: a request without a body contributes
/// nothing to the signable plaintext.
pub fn hex_md5(content: &[u8]) -> String {
    if content.is_empty() {
        return String::new();
    }
    hex::encode(Md5::digest(content).as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_md5() {
        assert_eq!(hex_md5(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(hex_md5(b"{}"), "99914b932bd37a50b983c5e7c90ae93b");
    }

    #[test]
    fn test_hex_md5_empty_short_circuits() {
        assert_eq!(hex_md5(b""), "");
    }

    #[test]
    fn test_base64_round_trip() {
        let decoded = base64_decode(&base64_encode(b"docsign")).unwrap();
        assert_eq!(decoded, b"docsign");
        assert!(base64_decode("not base64 !!!").is_err());
    }
}
