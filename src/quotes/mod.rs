//! Venue quoting: contract interfaces, per-venue adapters, and the
//! fan-out/fan-in price aggregator

pub mod adapter;
pub mod constant_product;
pub mod concentrated;
pub mod weighted;
pub mod meta_router;
pub mod aggregator;

pub use adapter::*;
pub use constant_product::*;
pub use concentrated::*;
pub use weighted::*;
pub use meta_router::*;
pub use aggregator::*;

use alloy::sol;

sol! {
    #[derive(Debug)]
    #[sol(rpc)]
    contract IPairPool {
        function getReserves() external view returns (uint256 reserve0, uint256 reserve1, uint256 blockTimestampLast);
        function token0() external view returns (address token);
        function token1() external view returns (address token);
    }

    #[derive(Debug)]
    #[sol(rpc)]
    contract IQuoterV2 {
        struct QuoteExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint256 amountIn;
            uint24 fee;
            uint160 sqrtPriceLimitX96;
        }

        function quoteExactInputSingle(QuoteExactInputSingleParams memory params) external returns (uint256 amountOut, uint160 sqrtPriceX96After, uint32 initializedTicksCrossed, uint256 gasEstimate);
    }

    #[derive(Debug)]
    #[sol(rpc)]
    contract IWeightedPool {
        function getBalance(address token) external view returns (uint256 balance);
        function getNormalizedWeight(address token) external view returns (uint256 weight);
    }

    #[derive(Debug)]
    #[sol(rpc)]
    contract IMetaRouter {
        function getAmountsOut(uint256 amountIn, address[] calldata path) external view returns (uint256[] memory amounts);
    }

    #[derive(Debug)]
    #[sol(rpc)]
    contract ILoanProvider {
        function availableLiquidity(address asset) external view returns (uint256 amount);
    }

    #[derive(Debug)]
    #[sol(rpc)]
    contract IArbExecutor {
        function executeArbitrage(address asset, uint256 amount, bytes calldata route) external;
        function resetBreaker(bytes32 key) external;
    }
}
