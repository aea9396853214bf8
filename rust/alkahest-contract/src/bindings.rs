//! Solidity interfaces of the deployed Alkahest and EAS contracts consumed by this crate.

use alloy::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct Attestation {
        bytes32 uid;
        bytes32 schema;
        uint64 time;
        uint64 expirationTime;
        uint64 revocationTime;
        bytes32 refUID;
        address recipient;
        address attester;
        bool revocable;
        bytes data;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct AttestationRequestData {
        address recipient;
        uint64 expirationTime;
        bool revocable;
        bytes32 refUID;
        bytes data;
        uint256 value;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct AttestationRequest {
        bytes32 schema;
        AttestationRequestData data;
    }

    /// Leading `(arbiter, demand)` pair shared by every escrow obligation's data.
    #[derive(Debug, PartialEq, Eq)]
    struct ArbiterDemand {
        address arbiter;
        bytes demand;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct LogicalDemand {
        address[] arbiters;
        bytes[] demands;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct AttesterDemand { address attester; }
    #[derive(Debug, PartialEq, Eq)]
    struct RecipientDemand { address recipient; }
    #[derive(Debug, PartialEq, Eq)]
    struct SchemaDemand { bytes32 schema; }
    #[derive(Debug, PartialEq, Eq)]
    struct UidDemand { bytes32 uid; }
    #[derive(Debug, PartialEq, Eq)]
    struct RefUidDemand { bytes32 refUID; }
    #[derive(Debug, PartialEq, Eq)]
    struct RevocableDemand { bool revocable; }
    #[derive(Debug, PartialEq, Eq)]
    struct TimeDemand { uint64 time; }
    #[derive(Debug, PartialEq, Eq)]
    struct ExpirationTimeDemand { uint64 expirationTime; }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IEAS {
        event Attested(address indexed recipient, address indexed attester, bytes32 uid, bytes32 indexed schemaUID);

        function getAttestation(bytes32 uid) external view returns (Attestation memory);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IERC20 {
        function approve(address spender, uint256 value) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IERC721 {
        function approve(address to, uint256 tokenId) external;
        function setApprovalForAll(address operator, bool approved) external;
        function isApprovedForAll(address owner, address operator) external view returns (bool);
        function ownerOf(uint256 tokenId) external view returns (address);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IERC1155 {
        function setApprovalForAll(address operator, bool approved) external;
        function isApprovedForAll(address account, address operator) external view returns (bool);
        function balanceOf(address account, uint256 id) external view returns (uint256);
    }

    /// Members common to every obligation contract.
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IObligation {
        function ATTESTATION_SCHEMA() external view returns (bytes32);
    }

    /// Members common to every escrow obligation contract. The attestation escrows
    /// return the collected attestation uid from `collectEscrow`; the return value is
    /// never decoded so the selector is all that matters here.
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IEscrowObligation {
        event EscrowMade(bytes32 indexed escrow, address indexed buyer);
        event EscrowCollected(bytes32 indexed escrow, bytes32 indexed fulfillment, address indexed fulfiller);

        function ATTESTATION_SCHEMA() external view returns (bytes32);
        function collectEscrow(bytes32 escrow, bytes32 fulfillment) external;
        function reclaimExpired(bytes32 uid) external returns (bool);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface ERC20EscrowObligation {
        struct ObligationData {
            address arbiter;
            bytes demand;
            address token;
            uint256 amount;
        }

        function doObligation(ObligationData calldata data, uint64 expirationTime) external returns (bytes32);
        function getObligationData(bytes32 uid) external view returns (ObligationData memory);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface ERC20PaymentObligation {
        struct ObligationData {
            address token;
            uint256 amount;
            address payee;
        }

        function doObligation(ObligationData calldata data, bytes32 refUID) external returns (bytes32 uid_);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface ERC721EscrowObligation {
        struct ObligationData {
            address arbiter;
            bytes demand;
            address token;
            uint256 tokenId;
        }

        function doObligation(ObligationData calldata data, uint64 expirationTime) external returns (bytes32);
        function doObligationFor(ObligationData calldata data, uint64 expirationTime, address recipient) external returns (bytes32);
        function getObligationData(bytes32 uid) external view returns (ObligationData memory);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface ERC721PaymentObligation {
        struct ObligationData {
            address token;
            uint256 tokenId;
            address payee;
        }

        function doObligation(ObligationData calldata data, bytes32 refUID) external returns (bytes32 uid_);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface ERC1155EscrowObligation {
        struct ObligationData {
            address arbiter;
            bytes demand;
            address token;
            uint256 tokenId;
            uint256 amount;
        }

        function doObligation(ObligationData calldata data, uint64 expirationTime) external returns (bytes32);
        function doObligationFor(ObligationData calldata data, uint64 expirationTime, address recipient) external returns (bytes32);
        function getObligationData(bytes32 uid) external view returns (ObligationData memory);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface ERC1155PaymentObligation {
        struct ObligationData {
            address token;
            uint256 tokenId;
            uint256 amount;
            address payee;
        }

        function doObligation(ObligationData calldata data, bytes32 refUID) external returns (bytes32 uid_);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface NativeTokenEscrowObligation {
        struct ObligationData {
            address arbiter;
            bytes demand;
            uint256 amount;
        }

        function doObligation(ObligationData calldata data, uint64 expirationTime) external payable returns (bytes32);
        function doObligationFor(ObligationData calldata data, uint64 expirationTime, address recipient) external payable returns (bytes32);
        function getObligationData(bytes32 uid) external view returns (ObligationData memory);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface NativeTokenPaymentObligation {
        struct ObligationData {
            uint256 amount;
            address payee;
        }

        function doObligation(ObligationData calldata data, bytes32 refUID) external payable returns (bytes32 uid_);
        function doObligationFor(ObligationData calldata data, address recipient, bytes32 refUID) external payable returns (bytes32 uid_);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface TokenBundleEscrowObligation {
        struct ObligationData {
            address arbiter;
            bytes demand;
            uint256 nativeAmount;
            address[] erc20Tokens;
            uint256[] erc20Amounts;
            address[] erc721Tokens;
            uint256[] erc721TokenIds;
            address[] erc1155Tokens;
            uint256[] erc1155TokenIds;
            uint256[] erc1155Amounts;
        }

        function doObligation(ObligationData calldata data, uint64 expirationTime) external payable returns (bytes32);
        function doObligationFor(ObligationData calldata data, uint64 expirationTime, address recipient) external payable returns (bytes32);
        function getObligationData(bytes32 uid) external view returns (ObligationData memory);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface TokenBundlePaymentObligation {
        struct ObligationData {
            uint256 nativeAmount;
            address[] erc20Tokens;
            uint256[] erc20Amounts;
            address[] erc721Tokens;
            uint256[] erc721TokenIds;
            address[] erc1155Tokens;
            uint256[] erc1155TokenIds;
            uint256[] erc1155Amounts;
            address payee;
        }

        function doObligation(ObligationData calldata data, bytes32 refUID) external payable returns (bytes32 uid_);
    }

    /// Barter utils pair an escrow (bid) with the payment it demands (ask) in one
    /// transaction. `buy*` escrows the bid, `pay*` fulfills an existing bid.
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface ERC20BarterUtils {
        function buyErc20ForErc20(address bidToken, uint256 bidAmount, address askToken, uint256 askAmount, uint64 expiration) external returns (bytes32);
        function payErc20ForErc20(bytes32 buyAttestation) external returns (bytes32);
        function buyErc721WithErc20(address bidToken, uint256 bidAmount, address askToken, uint256 askId, uint64 expiration) external returns (bytes32);
        function payErc20ForErc721(bytes32 buyAttestation) external returns (bytes32);
        function buyErc1155WithErc20(address bidToken, uint256 bidAmount, address askToken, uint256 askId, uint256 askAmount, uint64 expiration) external returns (bytes32);
        function payErc20ForErc1155(bytes32 buyAttestation) external returns (bytes32);
        function buyBundleWithErc20(address bidToken, uint256 bidAmount, TokenBundlePaymentObligation.ObligationData calldata askData, uint64 expiration) external returns (bytes32);
        function payErc20ForBundle(bytes32 buyAttestation) external returns (bytes32);
        function payErc20ForEth(bytes32 buyAttestation) external returns (bytes32);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface ERC721BarterUtils {
        function buyErc721ForErc721(address bidToken, uint256 bidTokenId, address askToken, uint256 askTokenId, uint64 expiration) external returns (bytes32);
        function payErc721ForErc721(bytes32 buyAttestation) external returns (bytes32);
        function buyErc20WithErc721(address bidToken, uint256 bidTokenId, address askToken, uint256 askAmount, uint64 expiration) external returns (bytes32);
        function payErc721ForErc20(bytes32 buyAttestation) external returns (bytes32);
        function buyErc1155WithErc721(address bidToken, uint256 bidTokenId, address askToken, uint256 askTokenId, uint256 askAmount, uint64 expiration) external returns (bytes32);
        function payErc721ForErc1155(bytes32 buyAttestation) external returns (bytes32);
        function buyBundleWithErc721(address bidToken, uint256 bidTokenId, TokenBundlePaymentObligation.ObligationData calldata askData, uint64 expiration) external returns (bytes32);
        function payErc721ForBundle(bytes32 buyAttestation) external returns (bytes32);
        function payErc721ForEth(bytes32 buyAttestation) external returns (bytes32);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface ERC1155BarterUtils {
        function buyErc1155ForErc1155(address bidToken, uint256 bidTokenId, uint256 bidAmount, address askToken, uint256 askTokenId, uint256 askAmount, uint64 expiration) external returns (bytes32);
        function payErc1155ForErc1155(bytes32 buyAttestation) external returns (bytes32);
        function buyErc20WithErc1155(address bidToken, uint256 bidTokenId, uint256 bidAmount, address askToken, uint256 askAmount, uint64 expiration) external returns (bytes32);
        function payErc1155ForErc20(bytes32 buyAttestation) external returns (bytes32);
        function buyErc721WithErc1155(address bidToken, uint256 bidTokenId, uint256 bidAmount, address askToken, uint256 askTokenId, uint64 expiration) external returns (bytes32);
        function payErc1155ForErc721(bytes32 buyAttestation) external returns (bytes32);
        function buyBundleWithErc1155(address bidToken, uint256 bidTokenId, uint256 bidAmount, TokenBundlePaymentObligation.ObligationData calldata askData, uint64 expiration) external returns (bytes32);
        function payErc1155ForBundle(bytes32 buyAttestation) external returns (bytes32);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface NativeTokenBarterUtils {
        function buyEthForEth(uint256 bidAmount, uint256 askAmount, uint64 expiration) external payable returns (bytes32);
        function payEthForEth(bytes32 buyAttestation) external payable returns (bytes32);
        function buyErc20WithEth(uint256 bidAmount, address askToken, uint256 askAmount, uint64 expiration) external payable returns (bytes32);
        function payEthForErc20(bytes32 buyAttestation) external payable returns (bytes32);
        function buyErc721WithEth(uint256 bidAmount, address askToken, uint256 askTokenId, uint64 expiration) external payable returns (bytes32);
        function payEthForErc721(bytes32 buyAttestation) external payable returns (bytes32);
        function buyErc1155WithEth(uint256 bidAmount, address askToken, uint256 askTokenId, uint256 askAmount, uint64 expiration) external payable returns (bytes32);
        function payEthForErc1155(bytes32 buyAttestation) external payable returns (bytes32);
        function buyBundleWithEth(uint256 bidAmount, TokenBundlePaymentObligation.ObligationData calldata askData, uint64 expiration) external payable returns (bytes32);
        function payEthForBundle(bytes32 buyAttestation) external payable returns (bytes32);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface TokenBundleBarterUtils {
        function buyBundleForBundle(TokenBundleEscrowObligation.ObligationData calldata bidData, TokenBundlePaymentObligation.ObligationData calldata askData, uint64 expiration) external returns (bytes32);
        function payBundleForBundle(bytes32 buyAttestation) external returns (bytes32);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface AttestationEscrowObligation {
        struct ObligationData {
            address arbiter;
            bytes demand;
            AttestationRequest attestation;
        }

        function doObligation(ObligationData calldata data, uint64 expirationTime) external returns (bytes32);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface AttestationEscrowObligation2 {
        struct ObligationData {
            bytes32 attestationUid;
            address arbiter;
            bytes demand;
        }

        function doObligation(ObligationData calldata data, uint64 expirationTime) external returns (bytes32);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface AttestationBarterUtils {
        function registerSchema(string calldata schema, address resolver, bool revocable) external returns (bytes32);
        function attest(bytes32 schema, address recipient, uint64 expirationTime, bool revocable, bytes32 refUID, bytes calldata data) external returns (bytes32);
        function attestAndCreateEscrow(AttestationRequest calldata attestation, address arbiter, bytes calldata demand, uint64 expiration) external returns (bytes32, bytes32);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface StringObligation {
        struct ObligationData {
            string item;
        }

        function doObligation(ObligationData calldata data, bytes32 refUID) external returns (bytes32 uid_);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface CommitRevealObligation {
        struct ObligationData {
            bytes payload;
            bytes32 salt;
            bytes32 schema;
        }

        event Committed(bytes32 indexed commitment, address indexed claimer);
        event BondReclaimed(bytes32 indexed obligationUid, address indexed claimer, uint256 amount);
        event BondSlashed(bytes32 indexed commitment, address indexed recipient, uint256 amount);

        function doObligation(ObligationData calldata data, bytes32 refUID) external returns (bytes32 uid_);
        function commit(bytes32 commitment) external payable;
        function computeCommitment(bytes32 refUID, address claimer, ObligationData calldata data) external pure returns (bytes32);
        function reclaimBond(bytes32 obligationUid) external returns (uint256 amount);
        function slashBond(bytes32 commitment) external returns (uint256 amount);
        function bondAmount() external view returns (uint256);
        function commitDeadline() external view returns (uint256);
        function slashedBondRecipient() external view returns (address);
        function commitments(bytes32 commitment) external view returns (uint64 commitBlock, uint64 commitTimestamp, address committer);
        function commitmentClaimed(bytes32 commitment) external view returns (bool);
    }

    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface TrustedOracleArbiter {
        struct DemandData {
            address oracle;
            bytes data;
        }

        event ArbitrationMade(bytes32 indexed decisionKey, bytes32 indexed obligation, address indexed oracle, bool decision);
        event ArbitrationRequested(bytes32 indexed obligation, address indexed oracle, bytes demand);

        function arbitrate(bytes32 obligation, bytes calldata demand, bool decision) external;
        function requestArbitration(bytes32 _obligation, address oracle, bytes calldata demand) external;
    }

    /// Union of the four confirmation arbiter variants; `revoke`, `escrowToFulfillment`
    /// and `escrowConfirmed` exist only on some of them.
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IConfirmationArbiter {
        event ConfirmationMade(bytes32 indexed fulfillment, bytes32 indexed escrow);
        event ConfirmationRequested(bytes32 indexed fulfillment, address indexed confirmer, bytes32 indexed escrow);
        event ConfirmationRevoked(bytes32 indexed fulfillment, bytes32 indexed escrow);

        function confirm(bytes32 fulfillment, bytes32 escrow) external;
        function revoke(bytes32 fulfillment, bytes32 escrow) external;
        function requestConfirmation(bytes32 fulfillment, bytes32 escrow) external;
        function confirmations(bytes32 fulfillment, bytes32 escrow) external view returns (bool);
        function escrowToFulfillment(bytes32 escrow) external view returns (bytes32);
        function escrowConfirmed(bytes32 escrow) external view returns (bool);
    }
}
