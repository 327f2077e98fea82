//! Solidity ABI surface shared by the module and the off-chain tooling.
//!
//! The account interface mirrors the subset of a multi-signature wallet the module relies on;
//! the module interface is what a relayer submits.

use alloy_sol_types::sol;

sol! {
    /// Account execution and signature-check entry points.
    interface IRelayAccount {
        function nonce() external view returns (uint256);

        /// Owner-authorised execution; verifies the full threshold and advances the nonce.
        function execTransaction(
            address to,
            uint256 value,
            bytes data,
            uint8 operation,
            bytes signatures
        ) external payable returns (bool success);

        function checkSignatures(bytes32 dataHash, bytes data, bytes signatures) external view;

        function checkNSignatures(
            bytes32 dataHash,
            bytes data,
            bytes signatures,
            uint256 requiredSignatures
        ) external view;

        /// Privileged entry point for enabled modules; no signature checks.
        function execTransactionFromModuleReturnData(
            address to,
            uint256 value,
            bytes data,
            uint8 operation
        ) external returns (bool success, bytes returnData);
    }

    /// Minimal fungible-token surface used for token refunds.
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool success);
    }

    /// Relayer-facing module entry point.
    interface IRelayRefundModule {
        function execTransactionWithRefund(
            address account,
            bytes execTransactionCallData,
            uint256 nonce,
            address currency,
            uint256 workLimit,
            uint256 feeRate,
            address recipient,
            bytes refundSignature
        ) external returns (uint256 payment);
    }
}
